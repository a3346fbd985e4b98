use clap::{CommandFactory, Parser};
use crossbeam::channel::unbounded;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sonisyncrs::{
    cli::{validate_device, Args, Command},
    config::{MidiSettings, Settings},
    data::{fetch_weather, load_telemetry, load_weather_file},
    error::{Result, SonifyError},
    event_loop::{EventLoop, LoopExit},
    logging,
    midi::{
        connect_clock_input, list_devices, pick_port, resolve_port, InternalClock, MidiError,
        MidirEngine, PortTarget,
    },
    ui::create_cursor_progress,
    Composition, ConsoleSink, MidiSink, ScaleTable, Sequencer, TelemetryComposition,
    WeatherComposition,
};

fn main() {
    initialize_logging();
    let args = parse_command_line_arguments();

    if args.device_list {
        list_available_devices();
        return;
    }

    if let Err(e) = run(&args) {
        let error_msg = format!("Error: {}", e);
        log::error!("{}", error_msg);
        eprintln!("{}", error_msg);
        std::process::exit(1);
    }
}

fn initialize_logging() {
    if let Err(e) = logging::init_logger() {
        eprintln!("Logging disabled: {}", e);
    }
    info!("Application starting");
}

fn parse_command_line_arguments() -> Args {
    Args::parse()
}

fn list_available_devices() {
    let (inputs, outputs) = list_devices();
    println!("Available MIDI inputs:");
    for device in &inputs {
        println!("  - {}", device);
    }
    println!("Available MIDI outputs:");
    for device in &outputs {
        println!("  - {}", device);
    }
}

fn run(args: &Args) -> Result<()> {
    let Some(command) = &args.command else {
        if let Err(e) = Args::command().print_help() {
            warn!("Failed to print help: {}", e);
        }
        return Ok(());
    };

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply_overrides(&mut settings);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match command {
        Command::Flight { data } => {
            let section = &settings.flight;
            section.validate()?;
            let scale = ScaleTable::range(&section.scale, &section.low, &section.high)?;
            let samples = load_telemetry(data)?;
            info!("Flight run over {} ({} notes)", scale.name(), scale.len());

            let composition = TelemetryComposition::new(samples, scale)?;
            play(args, &settings.midi, section.tempo, composition, rng)
        }
        Command::Weather {
            weather_file,
            melody,
        } => {
            let section = &settings.weather;
            section.validate()?;
            let scale = ScaleTable::range(&section.scale, &section.low, &section.high)?;
            let sample = match weather_file {
                Some(path) => load_weather_file(path)?,
                None => fetch_weather(&settings.api.request()?)?,
            };
            info!("Weather run over {} ({} notes)", scale.name(), scale.len());

            let composition = WeatherComposition::new(&sample, *melody, scale, &mut rng)?;
            println!(
                "Pad {} with melody {:?}",
                composition.lead(),
                composition
                    .melody()
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
            );
            play(args, &settings.midi, section.tempo, composition, rng)
        }
    }
}

fn play<C: Composition>(
    args: &Args,
    midi: &MidiSettings,
    tempo: u32,
    composition: C,
    rng: StdRng,
) -> Result<()> {
    let (tx, rx) = unbounded();

    if args.simulate {
        let clock = InternalClock::new(tempo);
        let clock = if args.instant { clock.instant() } else { clock };
        let handle = clock.start(tx);

        let mut sequencer = Sequencer::new(composition, ConsoleSink::stdout(), rng, tempo);
        EventLoop::new(rx).run(&mut sequencer);
        let _ = handle.join();
        return Ok(());
    }

    let (input_target, output_target) = resolve_targets(args, midi)?;
    let engine = MidirEngine::connect(&midi.client_name, &output_target)?;
    let _input = connect_clock_input(&midi.client_name, &input_target, tx)?;
    info!(
        "Live mode: clock from {:?}, notes to {:?}",
        input_target, output_target
    );
    println!(
        "Waiting for MIDI start on {:?}, sending notes to {:?}",
        input_target, output_target
    );

    let (_, len) = composition.position();
    let progress = create_cursor_progress(len, "Data");
    let mut sequencer = Sequencer::new(composition, MidiSink::new(engine), rng, tempo);
    match EventLoop::new(rx).with_progress(&progress).run(&mut sequencer) {
        LoopExit::Stopped => progress.finish_with_message("stopped"),
        LoopExit::Disconnected => progress.abandon_with_message("clock disconnected"),
    }
    Ok(())
}

fn resolve_targets(args: &Args, midi: &MidiSettings) -> Result<(PortTarget, PortTarget)> {
    let (inputs, outputs) = list_devices();

    if args.pick_ports {
        let input = pick_port("Clock input", &inputs, &midi.virtual_input_name())?;
        let output = pick_port("Note output", &outputs, &midi.virtual_output_name())?;
        return Ok((input, output));
    }

    if let Some(name) = &midi.input_port {
        validate_device(name, &inputs)
            .map_err(|msg| SonifyError::Midi(MidiError::ConnectionError(msg)))?;
    }
    if let Some(name) = &midi.output_port {
        validate_device(name, &outputs)
            .map_err(|msg| SonifyError::Midi(MidiError::ConnectionError(msg)))?;
    }

    Ok((
        resolve_port(midi.input_port.as_deref(), &midi.virtual_input_name()),
        resolve_port(midi.output_port.as_deref(), &midi.virtual_output_name()),
    ))
}
