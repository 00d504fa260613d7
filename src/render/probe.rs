//! Server connectivity probe.
//!
//! One request against the base URL before any route work. A dead or
//! erroring server fails the whole run up front with a hint, instead of
//! thirty captures timing out one by one.

use std::time::Duration;

use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use url::Url;

use crate::log;

/// Bound on the probe request.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Check that the target server answers on the base URL.
///
/// Connection failure or a 5xx answer is fatal; anything below 500 means
/// the server is up (individual routes may still 404, which is handled
/// per capture).
pub fn probe_server(base: &Url) -> Result<()> {
    log!("probe"; "testing connection to {base}");

    let client = reqwest::blocking::Client::builder()
        .timeout(PROBE_TIMEOUT)
        .build()?;

    match client.get(base.clone()).send() {
        Ok(response) if response.status().as_u16() < 500 => {
            log!("probe"; "server is running at {base}");
            Ok(())
        }
        Ok(response) => bail!(unreachable_hint(
            base,
            &format!("server returned status {}", response.status().as_u16())
        )),
        Err(e) => bail!(unreachable_hint(base, &e.to_string())),
    }
}

/// Actionable failure message for a dead preview server.
fn unreachable_hint(base: &Url, detail: &str) -> String {
    format!(
        "cannot connect to server at {base}: {detail}\n\
         ensure the preview server is running in another terminal:\n  \
         {} start your site's preview server\n  \
         {} wait for it to listen on port {}\n  \
         {} run this command again",
        "1.".bold(),
        "2.".bold(),
        base.port_or_known_default().unwrap_or(80).magenta(),
        "3.".bold(),
    )
}
