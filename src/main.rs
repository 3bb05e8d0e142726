use std::io::{self, BufRead, Cursor, Read};

use counter_scaffold::app::App;
use counter_scaffold::dom::Document;
use counter_scaffold::state::AppStore;
use counter_scaffold::{host, logging};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let mut first_line = Vec::new();
    input.read_until(b'\n', &mut first_line)?;
    let (settings, pending) = host::handshake(&host::decode_line(&first_line))?;

    logging::init_tracing(&settings.log_level);
    info!("Starting counter scaffold");

    let document = Document::new().with_mount_point(&settings.mount_id);
    let mut app = App::mount(document, settings, AppStore::default())?;

    let input = Cursor::new(pending.unwrap_or_default()).chain(input);
    host::run(&mut app, input, io::stdout().lock())?;

    info!(
        renders = app.renders(),
        intents = app.store().version(),
        "host input closed"
    );
    app.unmount();
    Ok(())
}
