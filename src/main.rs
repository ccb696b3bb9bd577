mod card;
mod catalogs;
mod domain;
mod storage;
mod ui;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::card::{TemplateRouter, compose, derive_date_badge};
use crate::catalogs::{recent_catalogs, remember_catalog, resolve_catalog_path};
use crate::domain::{EventDraft, sample_events};
use crate::storage::{load_catalog, save_catalog};
use crate::ui::{print_card, print_card_list, run_browser};

#[derive(Debug, Parser)]
#[command(name = "eventdeck", about = "Terminal event listing browser")]
struct Cli {
	#[arg(long)]
	catalog: Option<PathBuf>,
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
	Init,
	Browse,
	Add {
		#[arg(long)]
		title: String,
		#[arg(long)]
		date: String,
		#[arg(long)]
		location: String,
		#[arg(long)]
		description: Option<String>,
		#[arg(long)]
		organizer: Option<String>,
		#[arg(long)]
		image: Option<String>,
		#[arg(long, default_value_t = 0.0)]
		price: f64,
		#[arg(long)]
		quota: u32,
	},
	Seed {
		#[arg(long, default_value_t = 8)]
		count: usize,
	},
	List,
	Show {
		#[arg(long)]
		event: String,
	},
	Catalogs {
		#[arg(long, default_value_t = 20)]
		limit: usize,
	},
}

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::from_default_env()
				.add_directive(tracing::Level::WARN.into()),
		)
		.init();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> Result<(), Box<dyn Error>> {
	let cli = Cli::parse();

	if let Some(Command::Catalogs { limit }) = &cli.command {
		print_recent_catalogs(*limit)?;
		return Ok(());
	}

	let catalog_path = resolve_catalog_path(cli.catalog);
	let mut catalog = load_catalog(&catalog_path)?;
	if let Err(err) = remember_catalog(&catalog_path) {
		eprintln!("warning: failed to store recent catalog: {err}");
	}

	match cli.command.unwrap_or(Command::Browse) {
		Command::Init => {
			save_catalog(&catalog_path, &catalog)?;
			println!("initialized catalog at {}", catalog_path.display());
		}
		Command::Browse => {
			run_browser(&catalog)?;
		}
		Command::Add {
			title,
			date,
			location,
			description,
			organizer,
			image,
			price,
			quota,
		} => {
			if derive_date_badge(&date).is_err() {
				eprintln!("warning: date {date:?} does not parse; the card will show a dash");
			}
			let event_id = catalog.add_event(EventDraft {
				title,
				description: description.unwrap_or_default(),
				date,
				location,
				image,
				organizer,
				price,
				quota,
				attendees: None,
			});
			save_catalog(&catalog_path, &catalog)?;
			println!("created event {event_id}");
		}
		Command::Seed { count } => {
			for draft in sample_events(count) {
				catalog.add_event(draft);
			}
			save_catalog(&catalog_path, &catalog)?;
			println!("seeded {count} events");
		}
		Command::List => {
			print_card_list(&catalog);
		}
		Command::Show { event } => {
			let record = catalog
				.event(&event)
				.ok_or_else(|| format!("event not found: {event}"))?;
			print_card(&compose(record, &TemplateRouter::default()));
		}
		Command::Catalogs { .. } => {}
	}

	Ok(())
}

fn print_recent_catalogs(limit: usize) -> Result<(), Box<dyn Error>> {
	let rows = recent_catalogs()?;
	if rows.is_empty() {
		println!("no recent catalogs");
		return Ok(());
	}

	for (index, path) in rows.iter().take(limit).enumerate() {
		println!("{:>2}. {}", index + 1, path.display());
	}

	Ok(())
}
