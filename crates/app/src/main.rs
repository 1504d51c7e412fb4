#![cfg_attr(test, allow(unused_crate_dependencies))]
//! `multisel` binary.
//!
//! Claims the PRIMARY selection and, whenever another client pastes, pops up
//! a chooser listing the candidate strings. Startup order:
//! - parse flags and merge them over the config file
//! - read seed strings
//! - connect to X and check for other instances
//! - grab hotkeys unless a daemon already owns them
//! - acquire the selection and run the event loop

mod cli;
mod config;
mod delegate;
mod logging;
mod seeds;

use std::io;
use std::time::Instant;

use anyhow::{Context, bail};
use clap::Parser;
use multisel_engine::{Error, Mediator, SurfaceError};
use multisel_x11::{DAEMON_NAME, INSTANCE_NAME, X11Options, X11Surface};
use tracing::{info, warn};

use crate::cli::Cli;
use crate::config::Config;
use crate::delegate::CommandDelegate;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	logging::init(cli.verbose);

	let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
	config.merge_cli(&cli);
	let hotkeys = config.hotkeys()?;

	check_mode(cli.daemon, &cli.seeds)?;
	let seeds = seeds::read_seeds(&cli.seeds, config.capacity, io::stdin().lock()).context("reading strings from stdin")?;
	if seeds.is_empty() && !cli.daemon {
		info!("Starting with an empty list; use the capture hotkey to add strings");
	}

	let mut surface = X11Surface::connect(&X11Options { font: config.font.clone() }).context("connecting to the X server")?;
	let daemon_present = surface.instance_exists(DAEMON_NAME)?;
	if cli.daemon && daemon_present {
		bail!("a daemon instance is already running");
	}
	if !cli.daemon && surface.instance_exists(INSTANCE_NAME)? {
		bail!("another instance is already running");
	}
	surface.set_name(if cli.daemon { DAEMON_NAME } else { INSTANCE_NAME })?;

	if daemon_present {
		info!("Daemon instance running; leaving hotkeys to it");
	} else {
		surface.grab_hotkeys(&hotkeys)?;
	}

	let mut mediator = Mediator::new(surface, config.options(cli.daemon, daemon_present), seeds);
	if let Some(program) = &config.delegate {
		let delegate = CommandDelegate::resolve(program).with_context(|| format!("resolving delegate {}", program.display()))?;
		mediator = mediator.with_delegate(Box::new(delegate));
	}
	mediator.start().context("acquiring the PRIMARY selection")?;
	info!(candidates = mediator.store().len(), daemon = cli.daemon, "Running");

	let result = run(&mut mediator);
	if let Err(err) = mediator.shutdown() {
		warn!(error = %err, "Shutdown incomplete");
	}
	result
}

/// Daemon mode starts empty and fills itself from captures.
fn check_mode(daemon: bool, seeds: &[String]) -> anyhow::Result<()> {
	if daemon && !seeds.is_empty() {
		bail!("daemon mode takes no strings");
	}
	Ok(())
}

/// Only a lost display connection ends the loop; other backend failures skip the event.
fn is_fatal(error: &Error) -> bool {
	matches!(error, Error::Surface(SurfaceError::Disconnected))
}

/// Feeds X events to the mediator until it asks to quit.
fn run(mediator: &mut Mediator<X11Surface>) -> anyhow::Result<()> {
	let mut directive = mediator.pump(Instant::now())?;
	while !directive.should_quit {
		let step = match mediator.surface_mut().next_event(directive.poll_timeout)? {
			Some(event) => mediator.on_event(event, Instant::now()),
			None => mediator.pump(Instant::now()),
		};
		directive = match step {
			Ok(directive) => directive,
			Err(error) if is_fatal(&error) => return Err(error.into()),
			Err(error) => {
				warn!(%error, "Event handling failed; continuing");
				mediator.pump(Instant::now())?
			}
		};
	}
	info!("Exiting");
	Ok(())
}
