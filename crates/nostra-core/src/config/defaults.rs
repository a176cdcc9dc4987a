pub(super) fn default_name() -> String {
    "Nostra".to_string()
}
pub(super) fn default_data_dir() -> String {
    "~/.nostra".to_string()
}
pub(super) fn default_log_level() -> String {
    "info".to_string()
}
pub(super) fn default_db_path() -> String {
    "~/.nostra/data/nostra.db".to_string()
}
pub(super) fn default_true() -> bool {
    true
}
pub(super) fn default_min_delay() -> u64 {
    3
}
pub(super) fn default_max_delay() -> u64 {
    5
}
pub(super) fn default_history_limit() -> i64 {
    100
}
pub(super) fn default_api_base() -> String {
    "https://graph.facebook.com/v21.0".to_string()
}
pub(super) fn default_timeout_secs() -> u64 {
    30
}
