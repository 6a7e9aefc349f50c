//! Motion Arcade entry point
//!
//! Headless runner: drives one game for a fixed number of ticks from a
//! synthetic camera (or keyboard fallback only) and logs or dumps each frame.
//!
//! ```text
//! motion-arcade [GAME] [--ticks N] [--settings PATH] [--camera synthetic|none]
//!               [--dump PATH] [--autoplay] [--fast] [--mute]
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use motion_arcade::audio::LogAudio;
use motion_arcade::motion::MotionEstimator;
use motion_arcade::platform::{
    FrameSource, InputEvent, JsonLinesRenderer, Key, LogRenderer, ManualInput, NoCamera,
    RenderSink, SyntheticCamera,
};
use motion_arcade::sim::GameKind;
use motion_arcade::{Session, Settings, TickOutcome};

/// Ticks between autoplay Space presses
const AUTOPLAY_PERIOD: u64 = 60;
/// Ticks Space stays held during autoplay
const AUTOPLAY_HOLD: u64 = 25;

struct Args {
    game: GameKind,
    ticks: u64,
    settings: Option<String>,
    synthetic_camera: bool,
    dump: Option<String>,
    autoplay: bool,
    fast: bool,
    mute: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        game: GameKind::Pickleball,
        ticks: 600,
        settings: None,
        synthetic_camera: true,
        dump: None,
        autoplay: false,
        fast: false,
        mute: false,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--ticks" => {
                let value = it.next().ok_or("--ticks needs a value")?;
                args.ticks = value
                    .parse()
                    .map_err(|_| format!("invalid tick count: {value}"))?;
            }
            "--settings" => args.settings = Some(it.next().ok_or("--settings needs a path")?),
            "--camera" => match it.next().as_deref() {
                Some("synthetic") => args.synthetic_camera = true,
                Some("none") => args.synthetic_camera = false,
                other => return Err(format!("unknown camera: {other:?}")),
            },
            "--dump" => args.dump = Some(it.next().ok_or("--dump needs a path")?),
            "--autoplay" => args.autoplay = true,
            "--fast" => args.fast = true,
            "--mute" => args.mute = true,
            name => {
                args.game = GameKind::from_name(name).ok_or(format!("unknown game: {name}"))?;
            }
        }
    }
    Ok(args)
}

fn run<S: FrameSource>(
    args: &Args,
    settings: Settings,
    source: S,
    sink: &mut dyn RenderSink,
) {
    let tick = Duration::from_secs_f32(settings.tick_seconds.max(0.001));
    let estimator = MotionEstimator::new(&settings.estimator);
    let mut audio = LogAudio::new();
    audio.set_muted(args.mute);
    let mut session = Session::new(settings, source, estimator, audio);
    let mut manual = ManualInput::new();
    session.start(args.game);

    let mut ran = 0;
    for n in 0..args.ticks {
        let started = Instant::now();
        if args.autoplay {
            match n % AUTOPLAY_PERIOD {
                0 => manual.handle(InputEvent::KeyDown(Key::Space)),
                AUTOPLAY_HOLD => manual.handle(InputEvent::KeyUp(Key::Space)),
                _ => {}
            }
        }

        match session.tick(&mut manual) {
            TickOutcome::Continue(state) => sink.present(args.game, &state),
            TickOutcome::ReturnToMenu | TickOutcome::Quit => break,
        }
        ran += 1;

        if !args.fast {
            if let Some(rest) = tick.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    log::info!("Estimator finished in {:?} mode", session.estimator().mode());
    if let Some(sim) = session.simulation() {
        log::info!(
            "{} finished after {} ticks: score {}",
            args.game.as_str(),
            ran,
            sim.score().score
        );
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Motion Arcade starting...");

    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::from(2);
        }
    };

    let settings = args
        .settings
        .as_deref()
        .map(Settings::load_or_default)
        .unwrap_or_default();

    let mut sink: Box<dyn RenderSink> = match args.dump.as_deref() {
        Some(path) => match File::create(path) {
            Ok(file) => Box::new(JsonLinesRenderer::new(BufWriter::new(file))),
            Err(err) => {
                log::error!("Cannot create {path}: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => Box::new(LogRenderer::new(60)),
    };

    if args.synthetic_camera {
        run(&args, settings, SyntheticCamera::default(), sink.as_mut());
    } else {
        run(&args, settings, NoCamera, sink.as_mut());
    }
    ExitCode::SUCCESS
}
