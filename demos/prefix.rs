//! # Example: prefix
//!
//! Demonstrates how tag prefix matching works: one listener on `example.`
//! receives every event whose tag starts with it.
//!
//! ## Run
//! ```bash
//! cargo run --example prefix
//! ```

use futures::StreamExt;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let chn = tagbus::listen("example.").await;

    tokio::spawn(async {
        tagbus::signal("example.hello.world").await;
        tagbus::signal("unrelated.hello").await;
        tagbus::signal("example.hello.aliens").await;
    });

    // Avoid listening forever.
    let mut chn = chn.take(2);
    while let Some(e) = chn.next().await {
        println!("{}", e.tag());
    }
    Ok(())
}
