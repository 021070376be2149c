use std::env;
use std::process;

use tripboard::{ApiKey, AppState, Builder, Route, Session};

#[tokio::main]
async fn main() {
    let key = match ApiKey::from_env() {
        Ok(key) => key,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };
    let query = env::args()
        .nth(1)
        .unwrap_or_else(|| "Paris, France".to_owned());

    let client = Builder::new(key).connect();
    let mut session = Session::new(client, AppState::new(), Vec::<Route>::new());

    let outcome = session.search(&query).await;
    session.apply_search(outcome);
    let result = match session.search_results().first() {
        Some(result) => result.clone(),
        None => {
            eprintln!("no place found for {:?}", query);
            return;
        }
    };
    println!("{} ({})", result.display_name.text, result.formatted_address);

    if let Some(updates) = session.pin(result.clone()) {
        session.click(&result.id);
        session.drive(updates).await;
    }

    for summary in session.category_summaries(&result.id) {
        println!("  {} ⭐", summary);
    }

    let details = match session.detail_view() {
        Some(details) => details,
        None => return,
    };
    println!();
    for (category, attractions) in details.attractions.iter() {
        println!("{}", category.label());
        for attraction in attractions {
            println!("  {}", attraction.rating_label());
        }
    }
    println!();
    for (category, url) in session.detail_backgrounds().await {
        println!("{}: {}", category.label(), url);
    }
}
