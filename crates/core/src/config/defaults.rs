//! Default values for configuration

pub(crate) const DEFAULT_WEAVIATE_ENDPOINT: &str = "http://weaviate:8080";
pub(crate) const DEFAULT_DB_HOST: &str = "db";
pub(crate) const DEFAULT_DB_DATABASE: &str = "datasets";
pub(crate) const DEFAULT_DB_USER: &str = "postgres";
pub(crate) const DEFAULT_DB_PASSWORD: &str = "postgres";

pub(crate) fn default_weaviate_endpoint() -> String {
    DEFAULT_WEAVIATE_ENDPOINT.to_string()
}

pub(crate) fn default_db_host() -> String {
    DEFAULT_DB_HOST.to_string()
}

pub(crate) fn default_db_port() -> u16 {
    5432
}

pub(crate) fn default_db_database() -> String {
    DEFAULT_DB_DATABASE.to_string()
}

pub(crate) fn default_db_user() -> String {
    DEFAULT_DB_USER.to_string()
}

pub(crate) fn default_db_password() -> String {
    DEFAULT_DB_PASSWORD.to_string()
}
