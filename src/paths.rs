/// Resolve `input` against the remote working directory `cwd`.
///
/// Absolute inputs ignore `cwd`. A leading `~` expands to `home`. `.` and
/// `..` segments are collapsed; `..` never climbs above `/`.
pub fn resolve_remote_path(cwd: &str, home: &str, input: &str) -> String {
    let joined = if input.starts_with('/') {
        input.to_string()
    } else if input == "~" {
        home.to_string()
    } else if let Some(rest) = input.strip_prefix("~/") {
        format!("{}/{}", home, rest)
    } else {
        format!("{}/{}", cwd, input)
    };

    normalize(&joined)
}

/// Collapse `.`, `..` and repeated separators in an absolute path
pub fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    format!("/{}", segments.join("/"))
}
