use crate::{config::Config, error, spotify, spotify::HttpSpotify};

pub async fn auth(config: &Config) {
    let client = HttpSpotify::new(config);
    if let Err(e) = spotify::auth::auth(config, &client).await {
        error!("{}", e);
    }
}
