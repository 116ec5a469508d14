use {
    chrono::{DateTime, Local},
    std::{fs, path::Path, process::Command, time::SystemTime},
};

pub fn system_time_to_date_time(t: SystemTime) -> DateTime<Local> {
    DateTime::<Local>::from(t)
}

pub fn current_date_time() -> DateTime<Local> {
    system_time_to_date_time(SystemTime::now())
}

/// `%FT%H:%M:%S` as used in report headers
pub fn timestamp(t: &DateTime<Local>) -> String {
    t.format("%FT%H:%M:%S").to_string()
}

/// Last modification time of a file, if the filesystem knows it.
pub fn modified(path: &Path) -> Option<DateTime<Local>> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(system_time_to_date_time)
}

/// Short host name, or `"?"` when `hostname` is unavailable.
pub fn host_name() -> String {
    match Command::new("hostname").arg("-s").output() {
        Ok(o) if o.status.success() => String::from_utf8_lossy(&o.stdout).trim().to_string(),
        _ => String::from("?"),
    }
}
