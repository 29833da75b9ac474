pub mod article;

pub use article::{Article, ArticleDetail, ArticleEdit, ArticleFields, ArticleSummary, NewArticle};
