use assetdesk::run;

fn main() -> anyhow::Result<()> {
    // One session, one writer: everything runs on the calling thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run())
}
