use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use openal_bridge::config::{BridgeConfig, LibraryConfig};
use openal_bridge::constants::alc_string_param;
use openal_bridge::context::{AudioBindings, GroupAvailability};
use openal_bridge::dispatch::is_double_null_terminated_string;
use openal_bridge::loader::{default_bundle_dir, CandidatePolicy, Platform, SystemLibraryOpener};
use openal_bridge::version::AlVersion;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("al-probe error: {err:?}");
            ExitCode::from(1)
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "al-probe", about = "OpenAL library resolution diagnostics")]
struct Cli {
    /// Log library loading at info level.
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn execute(self) -> Result<()> {
        let mut config = BridgeConfig::load();
        config.logging.verbose |= self.verbose;
        openal_bridge::init_logging(&config.logging);

        match self.command {
            Command::Candidates(args) => candidates_command(args),
            Command::Probe(args) => probe_command(args, config.library),
            Command::Devices(args) => devices_command(args, config.library),
            Command::Version(args) => version_command(args, config.library),
            Command::String(args) => string_command(args, config.library),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the library candidates for a platform without loading anything.
    Candidates(CandidatesArgs),
    /// Load OpenAL and report entry point availability.
    Probe(LoadArgs),
    /// List playback and capture devices.
    Devices(LoadArgs),
    /// Print vendor, renderer and version of the default device.
    Version(LoadArgs),
    /// Query one ALC string parameter by name, without a device.
    String(StringArgs),
}

#[derive(Args, Debug, Clone)]
struct CandidatesArgs {
    /// Target platform (defaults to the host).
    #[arg(long, value_enum)]
    platform: Option<PlatformArg>,
    #[command(flatten)]
    library: LibraryArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
struct LoadArgs {
    #[command(flatten)]
    library: LibraryArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
struct StringArgs {
    /// Parameter name, e.g. ALC_EXTENSIONS or ALC_DEVICE_SPECIFIER.
    param: String,
    #[command(flatten)]
    load: LoadArgs,
}

#[derive(Args, Debug, Clone)]
struct LibraryArgs {
    /// Try the system OpenAL before the bundled one.
    #[arg(long, default_value_t = false)]
    prefer_system: bool,
    /// Directory holding the bundled OpenAL Soft and glue libraries.
    #[arg(long)]
    bundle_dir: Option<PathBuf>,
}

impl LibraryArgs {
    fn apply(&self, mut config: LibraryConfig) -> LibraryConfig {
        config.prefer_system |= self.prefer_system;
        if let Some(dir) = &self.bundle_dir {
            config.bundle_dir = Some(dir.clone());
        }
        config
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum PlatformArg {
    Linux,
    Android,
    Macos,
    Windows,
    Other,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Linux => Platform::Linux,
            PlatformArg::Android => Platform::Android,
            PlatformArg::Macos => Platform::MacOs,
            PlatformArg::Windows => Platform::Windows,
            PlatformArg::Other => Platform::Other,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

fn print_report<T: Serialize>(report: &T, format: OutputFormat, table: impl FnOnce(&T)) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report).context("serializing report")?;
            println!("{json}");
        }
        OutputFormat::Table => table(report),
    }
    Ok(())
}

fn load_bindings(library: &LibraryArgs, config: LibraryConfig) -> Result<AudioBindings> {
    let config = library.apply(config);
    AudioBindings::load(&config, Platform::current(), Arc::new(SystemLibraryOpener::new()))
        .context("loading OpenAL")
}

#[derive(Debug, Serialize)]
struct CandidatesReport {
    platform: Platform,
    prefer_system: bool,
    tool_libraries: Vec<String>,
    glue_libraries: Vec<Vec<String>>,
}

fn candidates_command(args: CandidatesArgs) -> Result<()> {
    let platform = args.platform.map_or_else(Platform::current, Platform::from);
    let bundle_dir = args.library.bundle_dir.clone().or_else(default_bundle_dir);
    let policy = CandidatePolicy::new(platform, args.library.prefer_system, bundle_dir);
    let glue = LibraryConfig::default().glue_libraries;

    let report = CandidatesReport {
        platform,
        prefer_system: args.library.prefer_system,
        tool_libraries: policy.tool_library_names(),
        glue_libraries: policy.glue_library_names(&glue),
    };

    print_report(&report, args.format, |report| {
        println!("Tool library candidates ({:?}):", report.platform);
        for (index, name) in report.tool_libraries.iter().enumerate() {
            println!("  {:>2}. {}", index + 1, name);
        }
        println!("Glue libraries:");
        for alternatives in &report.glue_libraries {
            println!("  - {}", alternatives.join(" | "));
        }
    })
}

#[derive(Debug, Serialize)]
struct ProbeReport {
    tool_library: Option<String>,
    attempted: Vec<String>,
    glue_libraries: Vec<String>,
    resolver: Option<&'static str>,
    groups: Vec<GroupAvailability>,
}

fn probe_command(args: LoadArgs, config: LibraryConfig) -> Result<()> {
    let bindings = load_bindings(&args.library, config)?;
    let bundle = bindings.bundle();

    let report = ProbeReport {
        tool_library: bundle.tool_library_name().map(str::to_string),
        attempted: bundle.attempted_tool_libraries().to_vec(),
        glue_libraries: bundle
            .glue_library_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        resolver: bundle.tool_resolver().map(|resolver| resolver.symbol()),
        groups: bindings.availability(),
    };

    print_report(&report, args.format, |report| {
        println!(
            "Tool library:  {}",
            report.tool_library.as_deref().unwrap_or("<none>")
        );
        println!("Glue:          {}", report.glue_libraries.join(", "));
        println!("Resolver:      {}", report.resolver.unwrap_or("<none>"));
        println!("{:<8} {:>9} {:>6}", "Group", "Available", "Total");
        for group in &report.groups {
            println!("{:<8} {:>9} {:>6}", group.group.name(), group.available, group.total);
        }
    })
}

#[derive(Debug, Serialize)]
struct DevicesReport {
    enumeration_ext: bool,
    enumerate_all_ext: bool,
    playback: Vec<String>,
    all_playback: Vec<String>,
    capture: Vec<String>,
}

fn devices_command(args: LoadArgs, config: LibraryConfig) -> Result<()> {
    let bindings = load_bindings(&args.library, config)?;
    let alc = bindings.alc();

    let enumerate_all_ext = alc.enumerate_all_ext_is_present()?;
    let report = DevicesReport {
        enumeration_ext: alc.enumeration_ext_is_present()?,
        enumerate_all_ext,
        playback: alc.get_device_specifiers()?,
        all_playback: if enumerate_all_ext {
            alc.get_all_device_specifiers()?
        } else {
            Vec::new()
        },
        capture: alc.get_capture_device_specifiers()?,
    };

    print_report(&report, args.format, |report| {
        println!("Playback devices:");
        for device in &report.playback {
            println!("  {device}");
        }
        if report.enumerate_all_ext {
            println!("All playback devices:");
            for device in &report.all_playback {
                println!("  {device}");
            }
        }
        println!("Capture devices:");
        for device in &report.capture {
            println!("  {device}");
        }
    })
}

fn version_command(args: LoadArgs, config: LibraryConfig) -> Result<()> {
    let bindings = load_bindings(&args.library, config)?;
    let version = AlVersion::probe(&bindings).context("querying AL version")?;
    print_report(&version, args.format, |version| {
        print!("{}", version.to_multiline_string());
    })
}

#[derive(Debug, Serialize)]
struct StringReport {
    param: String,
    values: Vec<String>,
}

fn string_command(args: StringArgs, config: LibraryConfig) -> Result<()> {
    let param = alc_string_param(&args.param)
        .ok_or_else(|| anyhow!("unknown ALC string parameter {}", args.param))?;
    let bindings = load_bindings(&args.load.library, config)?;
    let alc = bindings.alc();

    let values = if is_double_null_terminated_string(None, param) {
        alc.get_string_as_double_null_terminated_string(None, param)?
    } else {
        alc.get_string(None, param)?.into_iter().collect()
    };
    let report = StringReport {
        param: args.param,
        values,
    };

    print_report(&report, args.load.format, |report| {
        println!("{}:", report.param);
        for value in &report.values {
            println!("  {value}");
        }
    })
}
