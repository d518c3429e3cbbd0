//! Headless `--agent` mode: a blocking loop that reads JSON commands from
//! stdin and writes JSON responses to stdout.
//!
//! The stage never runs on a wall clock here. Time only passes when a command
//! asks for it (`step`, `run_until_idle`, or the single tick that `play`,
//! `reset` and `drag` run to apply their input).
//!
//! ## Protocol
//!
//! Each line of stdin is a JSON object with a `"cmd"` discriminator.
//! Each line of stdout is a JSON response with `"protocol_version"` and
//! `"type"` fields. See [`stage::agent_protocol`] for the full schema.

use std::io::{BufRead, Write};

use bevy::log::LogPlugin;
use bevy::prelude::*;

use stage::agent_protocol::{
    make_response, process_command, to_line, ResponsePayload, StageCommand, PROTOCOL_VERSION,
};
use stage::program::StagePrograms;
use stage::stage_params::StageParams;

pub fn run_agent_mode(params: StageParams, programs: StagePrograms) {
    // -- Build a minimal Bevy App: stage only, logs on stderr ---------------
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()));
    crate::build_stage_app(&mut app, params, programs);

    // Initial update so Startup spawns the roster.
    app.update();

    // -- I/O setup -----------------------------------------------------------
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    let _ = writeln!(stdout, "{}", to_line(&make_response(ResponsePayload::Ready)));
    let _ = stdout.flush();
    info!(
        "sprite-stage agent mode v{} ready, waiting for commands on stdin",
        PROTOCOL_VERSION
    );

    // -- Main command loop ---------------------------------------------------
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!("stdin read error: {e}");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<StageCommand>(&line) {
            Ok(cmd) => process_command(cmd, app.world_mut()),
            Err(e) => make_response(ResponsePayload::Error {
                message: format!("Parse error: {e}"),
            }),
        };
        let is_goodbye = matches!(response.payload, ResponsePayload::Goodbye);

        let _ = writeln!(stdout, "{}", to_line(&response));
        let _ = stdout.flush();

        if is_goodbye {
            break;
        }
    }

    info!("sprite-stage agent mode shutting down");
}
