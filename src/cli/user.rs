use crate::{cli::session, info};

pub async fn me() {
    let api = session::open_api().await;
    let user = match api.get_current_user().await {
        Ok(user) => user,
        Err(e) => session::fail(&api, "Failed to load profile", e).await,
    };

    info!(
        "Logged in as {} ({})",
        user.display_name.as_deref().unwrap_or(&user.id),
        user.id
    );
    if let Some(country) = user.country {
        info!("Country: {}", country);
    }
}
