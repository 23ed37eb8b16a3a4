mod r#static;
pub use r#static::StaticCredentialProvider;

mod func;
pub use func::ProvideCredentialFn;
