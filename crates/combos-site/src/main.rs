//! Demo binary: opens the modem editor and the combos table for the uuids
//! given on the command line and logs what the pages would render.
//!
//! ```bash
//! RUST_LOG=info cargo run -p combos-site -- <modem-uuid> [capability-set-uuid]
//! ```

use combos_site::config::SiteConfig;
use combos_site::lifecycle::ComboSite;
use combos_site::pages::{combo_rows, CapabilitySetView};
use resource_store::tracing::setup_tracing;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = SiteConfig::from_env().map_err(|e| e.to_string())?;
    let mut args = std::env::args().skip(1);
    let modem_uuid = args.next().ok_or("usage: combos-site <modem-uuid> [capability-set-uuid]")?;
    let capability_set_uuid = args.next();

    let mut site = ComboSite::new(config);
    let notices = site.take_notices();
    let notice_task = tokio::spawn(async move {
        let Some(mut notices) = notices else { return };
        while let Some(notice) = notices.recv().await {
            info!(level = ?notice.level, message = %notice.message, "Notice");
        }
    });

    let span = tracing::info_span!("modem_editor", uuid = %modem_uuid);
    async {
        let editor = site.modem_editor_page();
        editor.open(&modem_uuid).await;
        info!(title = %editor.title().await, "Modem editor");
        if let Some(message) = editor.error_message() {
            error!(%message, "Modem editor");
        }
    }
    .instrument(span)
    .await;

    if let Some(uuid) = capability_set_uuid {
        let span = tracing::info_span!("capability_set", %uuid);
        async {
            let page = site.capability_set_page();
            match page.select(Some(&uuid)).await {
                CapabilitySetView::Combos(capability_set) => match combo_rows(&capability_set).await {
                    Ok(rows) => {
                        for row in rows {
                            info!(combo = %row.combo_string, lte = ?row.lte_bands, nr = ?row.nr_bands, "Combo");
                        }
                    }
                    Err(e) => error!(error = %e, "Failed to read combos"),
                },
                view => info!(message = ?view.message(), "Combos table"),
            }
        }
        .instrument(span)
        .await;
    }

    site.shutdown().await?;
    let _ = notice_task.await;

    info!("Done");
    Ok(())
}
