//! `--console` mode: a blocking loop that reads JSON commands from stdin and
//! writes JSON responses to stdout.
//!
//! Each line of stdin is one command with a `"cmd"` discriminator; each line
//! of stdout is one response with `"protocol_version"` and `"type"` fields.
//! See [`landscape::console_protocol`] for the schema. Logs go to stderr.

use std::io::{BufRead, Write};

use landscape::config::WorldConfig;
use landscape::console::execute_line;
use landscape::console_protocol::{make_response, ConsoleResponse, ResponsePayload, PROTOCOL_VERSION};

pub fn run_console_mode(config: WorldConfig) {
    let world_size = config.world_size;
    let mut app = crate::build_app(config);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();

    if !write_response(&mut stdout, &make_response(ResponsePayload::Ready { world_size })) {
        return;
    }
    eprintln!("landscape console v{PROTOCOL_VERSION} ready, waiting for commands on stdin");

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("stdin read error: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = execute_line(&mut app, &line);
        let is_goodbye = matches!(response.payload, ResponsePayload::Goodbye);
        if !write_response(&mut stdout, &response) || is_goodbye {
            break;
        }
    }

    eprintln!("landscape console shutting down");
}

/// Write one response line. Returns false once stdout is gone.
fn write_response(out: &mut impl Write, response: &ConsoleResponse) -> bool {
    let json = match serde_json::to_string(response) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("response serialization failed: {e}");
            return true;
        }
    };
    writeln!(out, "{json}").and_then(|()| out.flush()).is_ok()
}
