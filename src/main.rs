use actix_files::Files;
use actix_governor::Governor;
use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use diesel::SqliteConnection;
use dotenvy::dotenv;

use feedvote::{
    api,
    config::AppConfig,
    fetcher::FeedFetcher,
    initialize_db_pool, observability,
    reader::Reader,
    run_migrations, security, subscriptions,
    tasks::feed_monitor,
    web_ui, DbPool,
};

/// CLI options
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Subscribe to a feed before starting the server (repeatable)
    #[clap(long = "add-feed", value_name = "URL")]
    add_feed: Vec<String>,

    /// Print the current subscriptions and exit
    #[clap(long)]
    list_feeds: bool,
}

fn main() -> std::io::Result<()> {
    dotenv().ok();
    observability::init_logging();

    let args = Args::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    let db_pool = initialize_db_pool(&config.db_path).map_err(|e| {
        log::error!("Failed to open database {}: {}", config.db_path, e);
        std::io::Error::other(e)
    })?;

    log::info!("Running database migrations");
    let mut conn = db_pool.get().map_err(std::io::Error::other)?;
    run_migrations(&mut conn).map_err(std::io::Error::other)?;

    if args.list_feeds {
        cli_list_feeds(&mut conn);
        return Ok(());
    }

    let reader = Reader::load(&mut conn, config.min_training_votes)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    drop(conn);

    run_server(config, db_pool, reader, args.add_feed)
}

fn cli_list_feeds(conn: &mut SqliteConnection) {
    match subscriptions::list(conn) {
        Ok(feeds) if feeds.is_empty() => println!("No feeds subscribed"),
        Ok(feeds) => {
            for feed in feeds {
                println!("{}\t{}", feed.url, feed.title);
            }
        }
        Err(e) => println!("Failed to list feeds: {}", e),
    }
}

#[actix_web::main]
async fn run_server(
    config: AppConfig,
    db_pool: DbPool,
    reader: Reader,
    add_feeds: Vec<String>,
) -> std::io::Result<()> {
    let fetcher = FeedFetcher::new().map_err(|e| std::io::Error::other(e.to_string()))?;

    for url in &add_feeds {
        match subscriptions::subscribe(&db_pool, &fetcher, url).await {
            Ok(feed) => log::info!("Subscribed to {} ({})", feed.url, feed.title),
            Err(e) => log::warn!("Could not subscribe to {}: {}", url, e),
        }
    }

    tracing::info!("Serving static files from {}", config.public_path);
    tracing::info!("Starting server at http://127.0.0.1:{}", config.port);

    tokio::spawn(feed_monitor::runner::start(
        db_pool.clone(),
        fetcher.clone(),
        config.check_interval,
    ));

    let reader = web::Data::new(reader);
    let public_path = config.public_path.clone();

    HttpServer::new(move || {
        let rate_limiter = security::create_rate_limiter();

        App::new()
            .wrap(Governor::new(&rate_limiter))
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(middleware::NormalizePath::trim())
            .wrap(security::SecurityHeaders)
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(fetcher.clone()))
            .app_data(reader.clone())
            .configure(api::routes::configure)
            .configure(web_ui::configure)
            .service(Files::new("/static", &public_path))
    })
    .workers(1)
    .bind(("127.0.0.1", config.port))?
    .run()
    .await
}
