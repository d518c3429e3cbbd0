//! `sprite-stage`: headless runner for the stage.
//!
//! Default mode loads optional params and programs, presses Play once, logs
//! every committed step in real time and exits when the play completes.
//! `--agent` switches to the JSON command loop in [`agent_mode`].

mod agent_mode;

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use stage::playback::{MessageCleared, PlayCompleted, PlayRequested, StepCommitted};
use stage::program::{ProgramEditor, StagePrograms};
use stage::stage_params::StageParams;
use stage::{StagePlugin, StageSet};

const USAGE: &str = "usage: sprite-stage [--agent] [--params <file.json>] [--programs <file.json>]";

/// Parsed command line.
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    agent: bool,
    params: Option<String>,
    programs: Option<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--agent" => cli.agent = true,
            "--params" => cli.params = Some(args.next().ok_or("--params needs a file")?),
            "--programs" => cli.programs = Some(args.next().ok_or("--programs needs a file")?),
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(cli)
}

/// Read params and programs from disk, falling back to defaults when a path
/// is not given.
fn load_inputs(cli: &CliArgs) -> Result<(StageParams, StagePrograms), String> {
    let params = match &cli.params {
        Some(path) => StageParams::from_json(&read(path)?)?,
        None => StageParams::default(),
    };
    let programs = match &cli.programs {
        Some(path) => StagePrograms::from_json(&read(path)?)?,
        None => StagePrograms::default(),
    };
    Ok((params, programs))
}

fn read(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("failed to read {path}: {e}"))
}

/// Insert params before `StagePlugin` so the roster, seed and tick come from
/// them, and seed both the stage and the editor with the loaded programs.
fn build_stage_app(app: &mut App, params: StageParams, programs: StagePrograms) {
    app.insert_resource(params);
    app.add_plugins(StagePlugin);
    app.insert_resource(ProgramEditor::with_programs(programs.0.clone()));
    app.insert_resource(programs);
}

fn main() -> AppExit {
    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            return AppExit::from_code(2);
        }
    };
    let (params, programs) = match load_inputs(&cli) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("{e}");
            return AppExit::from_code(1);
        }
    };

    if cli.agent {
        agent_mode::run_agent_mode(params, programs);
        return AppExit::Success;
    }

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_millis(10))),
        LogPlugin::default(),
    ));
    build_stage_app(&mut app, params, programs);
    app.add_systems(
        FixedUpdate,
        (
            request_play_once.before(StageSet::Start),
            (log_published, exit_on_completion).after(StageSet::Complete),
        ),
    );
    app.run()
}

fn request_play_once(mut requested: Local<bool>, mut play: EventWriter<PlayRequested>) {
    if !*requested {
        *requested = true;
        play.send(PlayRequested);
    }
}

fn log_published(
    mut committed: EventReader<StepCommitted>,
    mut cleared: EventReader<MessageCleared>,
) {
    for step in committed.read() {
        let s = &step.state;
        info!(
            "[{:>6}ms] sprite {} step {} '{}': pos=({}, {}) size={} rot={} msg={:?}",
            step.at_ms,
            step.sprite,
            step.index,
            step.action,
            s.position.x,
            s.position.y,
            s.size,
            s.rotation,
            s.message
        );
    }
    for clear in cleared.read() {
        info!("[{:>6}ms] sprite {} message cleared", clear.at_ms, clear.sprite);
    }
}

fn exit_on_completion(mut completed: EventReader<PlayCompleted>, mut exit: EventWriter<AppExit>) {
    if let Some(done) = completed.read().last() {
        info!(
            "Play completed in {}ms",
            done.finished_at_ms - done.started_at_ms
        );
        exit.send(AppExit::Success);
    }
}
