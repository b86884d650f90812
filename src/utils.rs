/// Joins the api base url and a resource under `/api`
///
/// # Arguments
/// * `base_url` server url, for example `http://localhost:5900`
/// * `resource` path below `/api`, for example `todos/<id>`
pub fn make_api_url(base_url: &str, resource: &str) -> String {
    format!(
        "{}/api/{}",
        base_url.trim_end_matches('/'),
        resource.trim_start_matches('/')
    )
}

/// Url of a route outside of `/api`, like `/health`
pub fn make_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
