use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const RECENT_CATALOGS_FILE: &str = "recent_catalogs.txt";
const DEFAULT_CATALOG_FILE: &str = "events.catalog";
// Recents exist so `catalogs` can offer a short pick list, not as history.
const RECENT_HISTORY: usize = 10;

/// Where to look, in order: the --catalog flag, EVENTDECK_CATALOG, the most
/// recently opened catalog, and finally a default file in the state dir so a
/// first run works without any setup.
pub fn resolve_catalog_path(cli_path: Option<PathBuf>) -> PathBuf {
	cli_path
		.or_else(|| {
			env::var_os("EVENTDECK_CATALOG")
				.map(PathBuf::from)
				.filter(|path| !path.as_os_str().is_empty())
		})
		.map(absolutize)
		.or_else(|| recent_catalogs().ok()?.into_iter().next())
		.unwrap_or_else(|| state_dir().join(DEFAULT_CATALOG_FILE))
}

pub fn remember_catalog(path: &Path) -> io::Result<()> {
	let path = absolutize(path.to_path_buf());
	let mut entries = recent_catalogs()?;
	entries.retain(|entry| entry != &path);
	entries.insert(0, path);
	entries.truncate(RECENT_HISTORY);

	fs::create_dir_all(state_dir())?;
	let body = entries
		.iter()
		.map(|entry| format!("{}\n", entry.display()))
		.collect::<String>();
	fs::write(recent_catalogs_path(), body)
}

pub fn recent_catalogs() -> io::Result<Vec<PathBuf>> {
	let raw = match fs::read_to_string(recent_catalogs_path()) {
		Ok(raw) => raw,
		Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
		Err(err) => return Err(err),
	};

	Ok(raw
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(PathBuf::from)
		.collect())
}

fn recent_catalogs_path() -> PathBuf {
	state_dir().join(RECENT_CATALOGS_FILE)
}

fn state_dir() -> PathBuf {
	if let Some(path) = env::var_os("EVENTDECK_STATE_DIR") {
		return PathBuf::from(path);
	}

	if let Some(path) = env::var_os("XDG_STATE_HOME") {
		return PathBuf::from(path).join("eventdeck");
	}

	if let Some(path) = env::var_os("HOME") {
		return PathBuf::from(path)
			.join(".local")
			.join("state")
			.join("eventdeck");
	}

	PathBuf::from(".eventdeck")
}

fn absolutize(path: PathBuf) -> PathBuf {
	if path.is_absolute() {
		return path;
	}

	match env::current_dir() {
		Ok(cwd) => cwd.join(path),
		Err(_) => path,
	}
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use super::resolve_catalog_path;

	#[test]
	fn flag_path_wins_and_is_absolutized() {
		let resolved = resolve_catalog_path(Some(PathBuf::from("party.catalog")));
		assert!(resolved.is_absolute());
		assert!(resolved.ends_with("party.catalog"));
	}

	#[test]
	fn absolute_flag_path_is_kept_verbatim() {
		let path = std::env::temp_dir().join("eventdeck_resolution.catalog");
		assert_eq!(resolve_catalog_path(Some(path.clone())), path);
	}
}
