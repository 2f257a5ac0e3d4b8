mod backend;
mod config;
mod error;
mod models;
mod profiles;
mod roles;
mod search;
mod tours;

use backend::{Backend, MemoryBackend, RestBackend};
use chrono::{Duration, Utc};
use config::KeyatConfig;
use roles::AuthContext;
use search::{sort_properties, sort_providers, PropertyFilter, ProviderFilter, SortOrder};
use tours::TourRequest;
use tracing::{info, Level};
use tracing_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🏠 Keyat - rental marketplace client");
    info!("====================================");

    let config = KeyatConfig::from_env();
    let backend: Box<dyn Backend> = if config.backend_url.is_empty() {
        info!("KEYAT_BACKEND_URL not set, using seeded in-memory data");
        Box::new(MemoryBackend::seeded())
    } else {
        Box::new(RestBackend::new(&config)?)
    };
    info!("Backend: {}", backend.name());

    // Resolve identity and role once, then pass it down.
    let ctx = AuthContext::load(backend.as_ref(), "/consumer/home").await?;
    match &ctx.profile {
        Some(profile) => info!(
            "Signed in as {} ({})",
            profile.display_name(),
            ctx.role.as_str()
        ),
        None => info!("Browsing as guest ({})", ctx.role.as_str()),
    }
    info!(
        "Navigation: {}",
        ctx.nav()
            .links
            .iter()
            .map(|l| l.label)
            .collect::<Vec<_>>()
            .join(" | ")
    );
    info!("");

    // Fetch the full list once, then filter and sort client-side.
    let sort = std::env::var("KEYAT_SORT")
        .ok()
        .and_then(|key| SortOrder::from_key(&key))
        .unwrap_or(SortOrder::PriceHigh);
    let mut properties = backend.list_properties().await?;
    let filter = PropertyFilter {
        locations: vec!["Gaborone".to_string()],
        ..Default::default()
    };
    properties = filter.apply(&properties);
    sort_properties(&mut properties, sort);

    info!("✅ {} available listings in Gaborone\n", properties.len());
    for (i, property) in properties.iter().enumerate() {
        println!(
            "{}. {} (P{:.2}/month)",
            i + 1,
            property.title,
            property.price as f64 / 100.0
        );
        println!(
            "   {} bed, {} bath, {} sqm",
            property.bedrooms, property.bathrooms, property.area_sqm
        );
        println!("   {}", property.location);
        if !property.amenities.is_empty() {
            println!("   Amenities: {}", property.amenities.join(", "));
        }
        println!();
    }

    // Top-rated service providers.
    let providers = backend.list_providers().await?;
    let mut providers = ProviderFilter::default().apply(&providers);
    sort_providers(&mut providers, SortOrder::RatingDesc);
    info!("🔧 {} service providers", providers.len());
    for provider in &providers {
        println!(
            "   {} [{}] {:.1}★ ({} reviews) {}",
            provider.name,
            provider.category,
            provider.rating,
            provider.review_count,
            provider.price_range
        );
    }
    println!();

    // Tour lifecycle demo for the signed-in tenant. Only runs against the
    // in-memory backend so a demo never writes rows to a real project.
    if let Ok(session) = ctx.require_session() {
        if backend.name() == "memory" {
            if let Some(pick) = properties.first() {
                let request = TourRequest {
                    property_id: pick.id,
                    tenant_id: session.user_id,
                    preferred_date: Utc::now() + Duration::days(3),
                    viewing_time: "10:30".to_string(),
                    notes: Some("First viewing".to_string()),
                };
                let tour = tours::schedule_tour(backend.as_ref(), &request).await?;
                info!("Scheduled demo tour of \"{}\"", pick.title);
                tours::cancel_tour(backend.as_ref(), tour.id).await?;
                info!("...and cancelled it again");
            }
        }

        let upcoming = tours::list_tours(backend.as_ref(), session.user_id).await?;
        info!("📅 {} tours on file", upcoming.len());
        for tour in &upcoming {
            println!(
                "   {} at {} ({:?}, {})",
                tour.preferred_date.format("%Y-%m-%d"),
                tour.viewing_time,
                tour.status,
                tour.agent_display()
            );
        }
    }

    // Save a snapshot of what was shown
    let json = serde_json::to_string_pretty(&properties)?;
    tokio::fs::write("listings_snapshot.json", json).await?;
    info!("💾 Saved {} listings to listings_snapshot.json", properties.len());

    Ok(())
}
