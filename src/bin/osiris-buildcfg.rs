//! Osiris Build Configuration Tooling
//!
//! This is the entry-point of `osiris-buildcfg`, a command-line tool to
//! verify and render the build configuration of Android application modules.
//! Its main input is the `osiris-build.toml` descriptor of a module. This tool
//! resolves the descriptor and either reports problems, prints the resolved
//! configuration, or writes the module build file.
//!
//! This CLI is mainly a dispatcher of the operations available in
//! `osiris_buildcfg`. It is a simple clap-based CLI that forwards the
//! arguments to `osiris_buildcfg` and visualizes the results.

use clap;
use osiris_buildcfg;

struct Cli {
    cmd: clap::Command,
}

impl Cli {
    fn new() -> Self {
        let mut cmd;

        cmd = clap::Command::new("osiris-buildcfg")
            .propagate_version(true)
            .subcommand_required(true)
            .about("Osiris Build Configuration Tooling")
            .long_about("Resolve and render the build configuration of Android application modules")
            .version(clap::crate_version!());

        cmd = cmd.arg(
            clap::Arg::new("descriptor")
                .long("descriptor")
                .value_name("PATH")
                .help("Path to the build descriptor relative to the working directory")
                .env("OSIRIS_BUILD_DESCRIPTOR")
                .default_value("./osiris-build.toml")
                .value_parser(clap::builder::ValueParser::os_string())
        );

        cmd = cmd.arg(
            clap::Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log resolution details to STDERR")
                .action(clap::ArgAction::SetTrue)
        );

        cmd = cmd.subcommand(
            clap::Command::new("check")
                .about("Verify the build descriptor")
        );

        cmd = cmd.subcommand(
            clap::Command::new("resolve")
                .about("Print the resolved build configuration")
                .arg(
                    clap::Arg::new("format")
                        .long("format")
                        .value_name("FORMAT")
                        .help("Output format of the resolved configuration")
                        .default_value("json")
                        .value_parser(["json", "properties"])
                )
        );

        cmd = cmd.subcommand(
            clap::Command::new("emerge")
                .about("Write the module build file")
                .arg(
                    clap::Arg::new("output")
                        .long("output")
                        .value_name("DIR")
                        .help("Module directory to write `build.gradle.kts` into")
                        .required(true)
                        .value_parser(clap::builder::ValueParser::os_string())
                )
                .arg(
                    clap::Arg::new("update")
                        .long("update")
                        .value_name("BOOL")
                        .help("Whether to allow updating an existing build file")
                        .default_value("false")
                        .value_parser(clap::builder::ValueParser::bool())
                )
        );

        Self {
            cmd: cmd,
        }
    }

    fn logging(&self, m: &clap::ArgMatches) {
        let level = if m.get_flag("verbose") { "debug" } else { "warn" };
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .init();
    }

    fn descriptor(
        &self,
        m: &clap::ArgMatches,
    ) -> Result<osiris_buildcfg::resolve::BuildDescriptor, u8> {
        let path = m.get_one::<std::ffi::OsString>("descriptor")
            .expect("Descriptor path lacks a value");

        match osiris_buildcfg::load_path(std::path::Path::new(path)) {
            Err(e) => {
                eprintln!("Cannot resolve build descriptor {:?}: {}", path, e);
                Err(1)
            },
            Ok(v) => {
                Ok(v)
            },
        }
    }

    fn op_check(
        &self,
        m: &clap::ArgMatches,
    ) -> Result<(), u8> {
        let descriptor = self.descriptor(m)?;

        println!(
            "{}: valid ({} build types, {} packaging rules)",
            descriptor.namespace(),
            descriptor.build_types().len(),
            descriptor.packaging().len(),
        );

        Ok(())
    }

    fn op_resolve(
        &self,
        m: &clap::ArgMatches,
        m_op: &clap::ArgMatches,
    ) -> Result<(), u8> {
        let descriptor = self.descriptor(m)?;
        let format = m_op.get_one::<String>("format").expect("Format-flag lacks a value");

        match format.as_str() {
            "properties" => {
                for (key, value) in osiris_buildcfg::render::gradle_properties(&descriptor) {
                    println!("{}={}", key, value);
                }
            },
            _ => {
                match serde_json::to_string_pretty(&descriptor) {
                    Err(e) => {
                        eprintln!("Cannot serialize build configuration: {}", e);
                        return Err(1);
                    },
                    Ok(v) => println!("{}", v),
                }
            },
        }

        Ok(())
    }

    fn op_emerge(
        &self,
        m: &clap::ArgMatches,
        m_op: &clap::ArgMatches,
    ) -> Result<(), u8> {
        let descriptor = self.descriptor(m)?;
        let output = m_op.get_one::<std::ffi::OsString>("output").expect("Output-flag lacks a value");
        let update = *m_op.get_one("update").expect("Update-flag lacks a value");

        match osiris_buildcfg::op::emerge::emerge(
            &descriptor,
            std::path::Path::new(output),
            update,
        ) {
            Err(osiris_buildcfg::op::emerge::Error::Already(file)) => {
                eprintln!("Cannot emerge build file: {:?} already present", file);
                Err(1)
            },
            Err(e) => {
                eprintln!("Cannot emerge build file: {}", e);
                Err(1)
            },
            Ok(_) => {
                Ok(())
            },
        }
    }

    fn run(mut self) -> Result<(), u8> {
        let (m, r);

        r = self.cmd.try_get_matches_from_mut(
            std::env::args_os(),
        );

        match r {
            Ok(v) => m = v,
            Err(e) => {
                return match e.kind() {
                    clap::error::ErrorKind::DisplayHelp |
                    clap::error::ErrorKind::DisplayVersion => {
                        e.print().expect("Cannot write to STDERR");
                        Ok(())
                    },
                    _ => {
                        e.print().expect("Cannot write to STDERR");
                        Err(2)
                    }
                }
            }
        }

        self.logging(&m);

        match m.subcommand() {
            Some(("check", _)) => self.op_check(&m),
            Some(("resolve", m_op)) => self.op_resolve(&m, m_op),
            Some(("emerge", m_op)) => self.op_emerge(&m, m_op),
            _ => std::unreachable!(),
        }
    }
}

fn main() -> std::process::ExitCode {
    match Cli::new().run() {
        Ok(()) => 0.into(),
        Err(v) => v.into(),
    }
}
