use directories::ProjectDirs;
use std::path::PathBuf;

pub(crate) fn default_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("org", "websheet", "websheet")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
