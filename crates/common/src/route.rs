/// Canonical form of a configured HTTP route: trimmed, with exactly one
/// leading `/`.
pub fn normalize_route_path(path: &str) -> String {
    format!("/{}", path.trim().trim_start_matches('/'))
}
