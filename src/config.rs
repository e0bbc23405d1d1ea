// config.rs
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    // Single admin credential pair, checked by the login handler
    pub admin_username: String,
    pub admin_password: String,
    // Cloudinary credentials; empty values are rejected by the upload
    // gateway before any request is attempted
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: String,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let admin_username = std::env::var("ADMIN_USERNAME").expect("ADMIN_USERNAME must be set");
        let admin_password = std::env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD must be set");

        // Session validity in minutes (default 30 days)
        let jwt_maxage = std::env::var("JWT_MAXAGE")
            .unwrap_or_else(|_| "43200".to_string());

        let app_url = std::env::var("APP_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string());

        let cloudinary_cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME")
            .unwrap_or_else(|_| "".to_string());
        let cloudinary_api_key = std::env::var("CLOUDINARY_API_KEY")
            .unwrap_or_else(|_| "".to_string());
        let cloudinary_api_secret = std::env::var("CLOUDINARY_API_SECRET")
            .unwrap_or_else(|_| "".to_string());

        Config {
            database_url,
            app_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().unwrap(),
            port: port.parse::<u16>().unwrap(),
            admin_username,
            admin_password,
            cloudinary_cloud_name,
            cloudinary_api_key,
            cloudinary_api_secret,
        }
    }
}
