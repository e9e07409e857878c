use reqwest::Method;

use crate::{error::Result, spotify::SpotifyApi, types::User};

impl SpotifyApi {
    pub async fn get_current_user(&self) -> Result<User> {
        let url = self.endpoint("/me");
        self.client.execute_json(Method::GET, &url, None).await
    }
}
