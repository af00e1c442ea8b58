use contracts::dashboards::d410_registrations::{
    RegistrationSource, RegistrationSummary, RegistrationTrendPoint,
};
use contracts::enums::SourceClass;

use super::repository;
use crate::shared::analytics::metrics::percentage;
use crate::shared::analytics::{day_name, parse_bucket_date, AnalyticsContext, DashboardError};

pub async fn get_summary(
    ctx: &AnalyticsContext,
    token: &str,
) -> Result<RegistrationSummary, DashboardError> {
    let window = ctx.window(token)?;
    let m = repository::summary(ctx, &window).await?;

    Ok(RegistrationSummary {
        total_registrations: m.int("total_registrations"),
        unique_referral_codes: m.int("unique_referral_codes"),
        active_days: m.int("active_days"),
        avg_registrations_per_day: m.float("avg_registrations_per_day"),
        valid_sr_linked_registrations: m.int("valid_sr_linked_registrations"),
        direct_registrations: m.int("direct_registrations"),
        sr_linked_percentage: m.float("sr_linked_percentage"),
    })
}

/// Daily registrations, most recent day first
pub async fn get_trends(
    ctx: &AnalyticsContext,
    token: &str,
) -> Result<Vec<RegistrationTrendPoint>, DashboardError> {
    let window = ctx.window(token)?;
    let rows = repository::daily_trend(ctx, &window).await?;

    Ok(rows
        .into_iter()
        .filter_map(|m| {
            let date = parse_bucket_date(m.text("bucket_date"))?;
            Some(RegistrationTrendPoint {
                date,
                total_registrations: m.int("total_registrations"),
                sr_linked_registrations: m.int("sr_linked_registrations"),
                direct_registrations: m.int("direct_registrations"),
                day_name: day_name(date),
            })
        })
        .collect())
}

pub async fn get_sources(
    ctx: &AnalyticsContext,
    token: &str,
) -> Result<Vec<RegistrationSource>, DashboardError> {
    let window = ctx.window(token)?;
    let buckets = repository::sources(ctx, &window).await?;
    Ok(build_sources(buckets))
}

/// Merge duplicate buckets, attach labels and percentages of the total,
/// largest bucket first.
pub fn build_sources(buckets: Vec<(SourceClass, i64)>) -> Vec<RegistrationSource> {
    let mut merged: Vec<(SourceClass, i64)> = Vec::new();
    for (class, count) in buckets {
        match merged.iter_mut().find(|(c, _)| *c == class) {
            Some((_, total)) => *total += count,
            None => merged.push((class, count)),
        }
    }

    let total: i64 = merged.iter().map(|(_, n)| n).sum();
    let position = |class: &SourceClass| SourceClass::all().iter().position(|c| c == class);
    merged.sort_by(|(a, na), (b, nb)| nb.cmp(na).then_with(|| position(a).cmp(&position(b))));

    merged
        .into_iter()
        .map(|(class, registrations)| RegistrationSource {
            source: class.label().to_string(),
            kind: class,
            registrations,
            percentage: percentage(registrations as f64, total as f64, 2),
        })
        .collect()
}
