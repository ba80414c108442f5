//! Demo data seeding
//!
//! Seeds one fully-scripted webinar on first run so the app has something to
//! play. Idempotent: a second run finds the slug and leaves the data alone.

use chrono::{Duration, Utc};
use stagecast_core::{
    auth, CountdownTimer, CtaButton, Database, Result, Schedule, ScriptedMessage, UserRole,
    Webhook, WebhookEvent, Webinar,
};
use tracing::info;

pub const DEMO_SLUG: &str = "scale-your-business";

const DEMO_HOST: &str = "demo-host";

/// Seed the demo webinar, returning it whether created or already present
pub fn seed_demo(db: &Database) -> Result<Webinar> {
    if let Some(existing) = db.webinars().find_by_slug(DEMO_SLUG)? {
        return Ok(existing);
    }

    let host = match db.users().find_by_username(DEMO_HOST)? {
        Some(user) => user,
        None => auth::register(db, DEMO_HOST, "demo", UserRole::Producer)?,
    };

    // Starts shortly after launch; long enough to cover the whole script
    let start = Utc::now() + Duration::minutes(1);
    let schedule = Schedule::new(start, start + Duration::minutes(25))?;

    let webinar = Webinar::new(
        DEMO_SLUG.into(),
        "How to Scale Your Business".into(),
        host.id,
        schedule,
    )
    .with_description("Live masterclass on sustainable growth strategies".into())
    .with_video_url("https://media.example.com/scale-your-business.mp4".into());
    db.webinars().create(&webinar)?;

    let script = [
        (0, "host", "Welcome everyone! We're just getting started."),
        (300, "sarah_k", "Great content so far!"),
        (600, "mike_r", "This is exactly what I needed, thanks!"),
    ];
    for (offset, username, body) in script {
        db.messages().create(&ScriptedMessage::new(
            webinar.id,
            username.into(),
            body.into(),
            offset,
        ))?;
    }

    let mut ebook = CtaButton::new(
        webinar.id,
        "Download the free e-book".into(),
        "https://example.com/ebook".into(),
        300,
        300,
    );
    ebook.color = "#10B981".to_string();
    db.events().create_cta(&ebook)?;

    db.events().create_cta(&CtaButton::new(
        webinar.id,
        "Enroll in the course".into(),
        "https://example.com/enroll".into(),
        900,
        300,
    ))?;

    // Countdown into the enrollment offer
    db.events()
        .create_timer(&CountdownTimer::new(webinar.id, 840, 60))?;

    db.webhooks().create(&Webhook::new(
        webinar.id,
        "https://hooks.example.com/stagecast".into(),
        vec![
            WebhookEvent::Reminder,
            WebhookEvent::Started,
            WebhookEvent::Ended,
        ],
    ))?;

    info!(slug = DEMO_SLUG, webinar_id = %webinar.id, "Seeded demo webinar");
    Ok(webinar)
}
