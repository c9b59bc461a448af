//! # Example: signal
//!
//! The simplest use: listen for, and announce, a tag-only event on the
//! process-wide default dispatcher.
//!
//! ## Run
//! ```bash
//! cargo run --example signal
//! ```

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut chn = tagbus::listen("example.hello").await;

    tokio::spawn(async {
        tagbus::signal("example.hello").await;
    });

    if let Some(e) = chn.recv().await {
        println!("{}", e.tag());
    }
    Ok(())
}
