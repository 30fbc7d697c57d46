use clap::{Parser, Subcommand};
use escrow_reconciler::application::reconciler::{
    PayOutcome, PaymentReconciler, ReconcilerPorts, ReconcilerView,
};
use escrow_reconciler::config::ReconcilerConfig;
use escrow_reconciler::domain::gateway::GatewayCallback;
use escrow_reconciler::domain::notice::format_rupees;
use escrow_reconciler::domain::ports::{PaymentCacheBox, SessionMarkersBox};
use escrow_reconciler::domain::quote::{OrderDetails, ServiceRequest};
use escrow_reconciler::infrastructure::gateway::RedirectGateway;
use escrow_reconciler::infrastructure::http::{HttpEscrowApi, HttpNotifier};
use escrow_reconciler::infrastructure::in_memory::{InMemoryPaymentCache, InMemorySessionMarkers};
use escrow_reconciler::infrastructure::json_file::JsonFileStore;
use escrow_reconciler::infrastructure::scheduler::TokioScheduler;
use escrow_reconciler::interfaces::csv::record_writer::RecordWriter;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the escrow backend (overrides ESCROW_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory of the JSON payment cache. Without it, the cache lives in memory.
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Path to a RocksDB payment cache (requires the 'storage-rocksdb' feature)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the price breakdown for a base amount
    Quote { amount: u64 },
    /// Reconcile a request's payment and print the checkout step
    Status { request_id: String },
    /// Create an escrow order and hand the client to the gateway checkout
    Pay {
        request_id: String,
        #[arg(long)]
        client_id: String,
        /// Service request JSON to price the order from (offers, package, budget)
        #[arg(long)]
        request: Option<PathBuf>,
        #[arg(long)]
        creator_id: Option<String>,
        /// Base amount in major units, before platform fee and GST. Overrides the
        /// price resolved from --request.
        #[arg(long)]
        amount: Option<u64>,
        #[arg(long)]
        creator_name: Option<String>,
        #[arg(long)]
        project_type: Option<String>,
    },
    /// Deliver the gateway's success callback
    Callback {
        request_id: String,
        #[arg(long)]
        order_id: String,
        #[arg(long)]
        payment_id: String,
        #[arg(long)]
        signature: String,
    },
    /// Ask the backend to verify a pending payment
    Verify { request_id: String },
    /// Release escrowed funds to the creator
    Release { request_id: String },
    /// Write all cached payment records as CSV
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = ReconcilerConfig::from_env().into_diagnostic()?;
    if let Some(url) = cli.api_url.clone() {
        config = config.with_api_base_url(url).into_diagnostic()?;
    }

    let (cache, markers) = open_cache(&cli)?;

    let request_id = match &cli.command {
        Command::Quote { amount } => {
            let quote = config.fees.quote(*amount).into_diagnostic()?;
            println!("base: {}", format_rupees(quote.base));
            println!("platform_fee: {}", format_rupees(quote.platform_fee));
            println!("gst: {}", format_rupees(quote.gst));
            println!("total: {}", quote.total);
            return Ok(());
        }
        Command::List => {
            let records = cache.all().await.into_diagnostic()?;
            let stdout = io::stdout();
            let mut writer = RecordWriter::new(stdout.lock());
            writer.write_records(&records).into_diagnostic()?;
            return Ok(());
        }
        Command::Status { request_id }
        | Command::Pay { request_id, .. }
        | Command::Callback { request_id, .. }
        | Command::Verify { request_id }
        | Command::Release { request_id } => request_id.clone(),
    };

    let ports = ReconcilerPorts {
        cache,
        markers,
        api: Box::new(HttpEscrowApi::new(&config).into_diagnostic()?),
        gateway: Box::new(RedirectGateway),
        notifier: Box::new(HttpNotifier::new(&config).into_diagnostic()?),
        scheduler: Box::new(TokioScheduler),
    };
    let fees = config.fees;
    let reconciler = PaymentReconciler::new(request_id, ports, config);
    let loaded = reconciler.reconcile_on_load().await;

    match cli.command {
        Command::Status { .. } => print_view(&loaded),
        Command::Pay {
            client_id,
            request,
            creator_id,
            amount,
            creator_name,
            project_type,
            ..
        } => {
            let service_request = match request {
                Some(path) => {
                    let raw = fs::read_to_string(&path).into_diagnostic()?;
                    serde_json::from_str::<ServiceRequest>(&raw).into_diagnostic()?
                }
                None => ServiceRequest::default(),
            };
            let mut order = OrderDetails::from_request(&service_request, &fees).into_diagnostic()?;
            if let Some(amount) = amount {
                order = order.with_quote(fees.quote(amount).into_diagnostic()?);
            }
            if let Some(creator_id) = creator_id {
                order.creator_id = creator_id;
            }
            if let Some(name) = creator_name {
                order = order.with_creator_name(name);
            }
            if let Some(project_type) = project_type {
                order = order.with_project_type(project_type);
            }

            match reconciler.pay(&order, &client_id).await.into_diagnostic()? {
                PayOutcome::Redirected(session) => {
                    println!("checkout_order_id: {}", session.order_id);
                    println!("checkout_key: {}", session.key_id);
                    println!("checkout_amount_minor: {}", session.amount_minor);
                    println!("checkout_currency: {}", session.currency);
                    print_view(&reconciler.view().await);
                }
                PayOutcome::Escrowed(view) => print_view(&view),
            }
        }
        Command::Callback {
            order_id,
            payment_id,
            signature,
            ..
        } => {
            let callback = GatewayCallback {
                order_id,
                payment_id,
                signature,
            };
            let view = reconciler.gateway_callback(callback).await.into_diagnostic()?;
            print_view(&view);
        }
        Command::Verify { .. } => {
            let view = reconciler.verify().await.into_diagnostic()?;
            print_view(&view);
        }
        Command::Release { .. } => {
            let view = reconciler.release().await.into_diagnostic()?;
            print_view(&view);
        }
        Command::Quote { .. } | Command::List => {}
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_cache(cli: &Cli) -> Result<(PaymentCacheBox, SessionMarkersBox)> {
    if let Some(db_path) = &cli.db_path {
        #[cfg(feature = "storage-rocksdb")]
        {
            use escrow_reconciler::infrastructure::rocksdb::RocksDbStore;
            let store = RocksDbStore::open(db_path).into_diagnostic()?;
            return Ok((Box::new(store.clone()), Box::new(store)));
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        {
            eprintln!(
                "WARNING: Persistent storage requested via --db-path ({}), but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage.",
                db_path.display()
            );
            return Ok((
                Box::new(InMemoryPaymentCache::new()),
                Box::new(InMemorySessionMarkers::new()),
            ));
        }
    }

    if let Some(dir) = &cli.cache_dir {
        let store = JsonFileStore::open(dir).into_diagnostic()?;
        return Ok((Box::new(store.clone()), Box::new(store)));
    }

    Ok((
        Box::new(InMemoryPaymentCache::new()),
        Box::new(InMemorySessionMarkers::new()),
    ))
}

fn print_view(view: &ReconcilerView) {
    println!("request: {}", view.request_id);
    println!("step: {}", view.step);
    println!("payment: {}", view.payment_id.as_deref().unwrap_or("-"));
    if let Some(gateway_payment_id) = &view.gateway_payment_id {
        println!("gateway_payment: {}", gateway_payment_id);
    }
    if view.simulation {
        println!("simulation: true");
    }
    if let Some(banner) = &view.banner {
        println!("message: {}", banner.text);
    }
    let actions: Vec<String> = view
        .actions
        .iter()
        .map(|action| format!("{:?}", action).to_lowercase())
        .collect();
    println!(
        "actions: {}",
        if actions.is_empty() {
            "none".to_string()
        } else {
            actions.join(", ")
        }
    );
}
