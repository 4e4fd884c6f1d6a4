use crate::infra::{InMemoryApprovalStore, StaticReviewSource};
use clap::Args;
use reviewdeck::error::AppError;
use reviewdeck::reviews::{
    detect_categories, DashboardAnalytics, RatingRange, Review, ReviewDashboardService,
    ReviewFilter, SortDirection, SortField, SortKey,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Restrict the report to a single property
    #[arg(long)]
    pub(crate) property: Option<String>,
    /// Raw review export (JSON array in the booking API shape); defaults to
    /// the bundled fixture dataset
    #[arg(long)]
    pub(crate) reviews_json: Option<PathBuf>,
    /// Include the normalized review listing in the output
    #[arg(long)]
    pub(crate) list_reviews: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Property to feature in the walkthrough (defaults to the first one)
    #[arg(long)]
    pub(crate) property: Option<String>,
    /// Skip the approval-toggle portion of the demo
    #[arg(long)]
    pub(crate) skip_toggle: bool,
}

fn service_over(
    records: Vec<Value>,
) -> ReviewDashboardService<StaticReviewSource, InMemoryApprovalStore> {
    ReviewDashboardService::new(
        Arc::new(StaticReviewSource::new(records)),
        Arc::new(InMemoryApprovalStore::default()),
    )
}

pub(crate) async fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        property,
        reviews_json,
        list_reviews,
    } = args;

    let records: Vec<Value> = match reviews_json {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        }
        None => reviewdeck::reviews::fixtures::raw_reviews().to_vec(),
    };

    let service = service_over(records);

    if list_reviews {
        let reviews = service.load_reviews().await?;
        println!("Normalized reviews ({})", reviews.len());
        for review in &reviews {
            render_review_line(review);
        }
        println!();
    }

    match service.analytics(property.as_deref()).await? {
        Some(analytics) => render_analytics(&analytics, property.as_deref()),
        None => println!("No reviews to report on."),
    }

    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = service_over(reviewdeck::reviews::fixtures::raw_reviews().to_vec());

    println!("Guest review pipeline demo");

    let reviews = service.load_reviews().await?;
    let categories = detect_categories(&reviews);
    println!(
        "Loaded {} guest reviews across {} rating categories: {}",
        reviews.len(),
        categories.len(),
        categories.join(", ")
    );

    let featured = args
        .property
        .or_else(|| reviews.first().map(|review| review.listing_name.clone()))
        .unwrap_or_default();

    println!("\nManagement view: cleanliness 8-10, best rated first");
    let mut ranges = BTreeMap::new();
    ranges.insert(
        "cleanliness".to_string(),
        RatingRange {
            min: 8.0,
            max: 10.0,
        },
    );
    let filter = ReviewFilter {
        category_ranges: ranges,
        ..ReviewFilter::default()
    };
    let sort = SortKey {
        field: SortField::Rating,
        direction: SortDirection::Desc,
    };
    let shortlist = service.query(&filter, &sort).await?;
    for review in &shortlist {
        render_review_line(review);
    }

    if !args.skip_toggle {
        println!("\nApproving the two best-rated reviews for public display");
        for review in shortlist.iter().take(2) {
            if let Some(id) = review.id {
                service.set_approval(id, true)?;
                println!("- approved #{id} ({})", review.guest_name);
            }
        }

        println!("\nPublic page for {featured}");
        let page = service.public_reviews(&featured).await?;
        if page.is_empty() {
            println!("- no approved reviews yet");
        }
        for review in &page {
            render_review_line(review);
        }
    }

    println!();
    match service.analytics(None).await? {
        Some(analytics) => render_analytics(&analytics, None),
        None => println!("No reviews to report on."),
    }

    Ok(())
}

fn render_review_line(review: &Review) {
    let rating = review
        .rating
        .map(|value| format!("{value:.2}"))
        .unwrap_or_else(|| "unrated".to_string());
    let visibility = if review.display_on_website {
        "shown"
    } else {
        "hidden"
    };
    println!(
        "- [{}] {} | {} | {} | {}",
        rating,
        review.listing_name,
        review.guest_name,
        review.submitted_at,
        visibility
    );
}

fn render_analytics(analytics: &DashboardAnalytics, property: Option<&str>) {
    match property {
        Some(name) => println!("Review report for {name}"),
        None => println!("Review report for all properties"),
    }
    println!(
        "{} reviews, overall average {:.2}, {} propert{}",
        analytics.total_reviews,
        analytics.overall_average,
        analytics.unique_properties_count,
        if analytics.unique_properties_count == 1 {
            "y"
        } else {
            "ies"
        }
    );

    println!("\nCategory averages");
    for entry in &analytics.category_chart_data {
        println!("- {}: {:.2}", entry.label, entry.average);
    }

    println!("\nRating distribution");
    for bucket in &analytics.rating_pie_data {
        println!("- {}: {}", bucket.label, bucket.count);
    }

    println!("\nProperties by rating");
    for rollup in &analytics.properties_by_rating {
        println!(
            "- {}: {:.2} over {} review{}, {} low category score{}",
            rollup.listing_name,
            rollup.average_rating,
            rollup.total_reviews,
            if rollup.total_reviews == 1 { "" } else { "s" },
            rollup.low_ratings,
            if rollup.low_ratings == 1 { "" } else { "s" }
        );
    }

    println!("\nMonthly trend");
    for point in &analytics.rating_over_time_data {
        println!("- {}: {:.2}", point.label, point.average);
    }
}
