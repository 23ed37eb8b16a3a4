//! Fetch an object from S3 with a signed GET.
//!
//! ```shell
//! export AWS_ACCESS_KEY_ID=...
//! export AWS_SECRET_ACCESS_KEY=...
//! cargo run --example s3_get -- https://my-bucket.s3.amazonaws.com/my-object
//! ```

use sigfetch::aws::SigningOptions;
use sigfetch::aws::StaticCredentialProvider;
use sigfetch::SignedFetcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let url = std::env::args()
        .nth(1)
        .expect("usage: s3_get <https://bucket.s3.amazonaws.com/key>");
    let access_key_id = std::env::var("AWS_ACCESS_KEY_ID")?;
    let secret_access_key = std::env::var("AWS_SECRET_ACCESS_KEY")?;

    let fetcher = SignedFetcher::new(
        SigningOptions::new("s3")
            .with_credentials(StaticCredentialProvider::new(&access_key_id, &secret_access_key)),
    )?;

    let resp = fetcher.fetch(url, None).await?;
    println!("status: {}", resp.status());
    println!("body: {} bytes", resp.body().len());

    Ok(())
}
