//! Storefront CLI

use std::{
    io::{self, Write},
    process::ExitCode,
    str::FromStr,
    sync::Arc,
};

use clap::{Args, Parser, Subcommand};
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{debug, info};

use storefront::{
    config::StorefrontConfig,
    observability::{self, ObservabilityError},
    prelude::*,
};

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront client", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: StorefrontConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the product catalog
    Products(ProductsArgs),

    /// Show a single product
    Product(ProductArgs),

    /// Build a cart and place an order
    Checkout(CheckoutArgs),
}

#[derive(Debug, Args)]
struct ProductsArgs {
    /// Only list products whose name or description contains this text
    #[arg(long)]
    search: Option<String>,
}

#[derive(Debug, Args)]
struct ProductArgs {
    /// Product id
    id: u64,
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    /// Product to add, as ID or IDxQUANTITY (repeatable)
    #[arg(long = "item", required = true)]
    items: Vec<ItemSpec>,

    /// Customer email address
    #[arg(long)]
    email: String,

    /// Shipping address
    #[arg(long)]
    address: String,

    /// Note for the order
    #[arg(long, default_value = "")]
    note: String,

    /// Print the cart without submitting the order
    #[arg(long)]
    dry_run: bool,
}

/// A `--item` argument.
#[derive(Debug, Clone, Copy)]
struct ItemSpec {
    id: ProductId,
    quantity: u32,
}

impl FromStr for ItemSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, quantity) = s.split_once(['x', 'X']).unwrap_or((s, "1"));

        let id = id
            .trim()
            .parse::<u64>()
            .map_err(|err| format!("invalid product id in '{s}': {err}"))?;

        let quantity = quantity
            .trim()
            .parse::<u32>()
            .map_err(|err| format!("invalid quantity in '{s}': {err}"))?;

        if quantity == 0 {
            return Err(format!("quantity must be at least 1 in '{s}'"));
        }

        Ok(Self {
            id: ProductId::new(id),
            quantity,
        })
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Observability(#[from] ObservabilityError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    ProductSource(#[from] ProductSourceError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Summary(#[from] SummaryError),

    #[error("failed to write output")]
    Io(#[from] io::Error),
}

#[tokio::main]
pub async fn main() -> ExitCode {
    // Load .env file if present (ignore if missing)
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        #[expect(
            clippy::print_stderr,
            reason = "errors are reported to the terminal user, logging may be filtered"
        )]
        {
            eprintln!("{error}");
        }

        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { config, command } = cli;

    observability::init_subscriber(&config.logging)?;

    let (source, currency) = product_source(&config)?;

    match command {
        Commands::Products(args) => {
            let mut products = source.list_products().await?;

            if let Some(query) = &args.search {
                products = search(products, query);
            }

            write_catalog(io::stdout().lock(), &products)?;
        }
        Commands::Product(args) => {
            let product = source.get_product(ProductId::new(args.id)).await?;

            write_product(io::stdout().lock(), &product)?;
        }
        Commands::Checkout(args) => {
            run_checkout(&config, source.as_ref(), currency, args).await?;
        }
    }

    Ok(())
}

/// Pick the YAML catalog when one is configured, otherwise the product API.
fn product_source(
    config: &StorefrontConfig,
) -> Result<(Arc<dyn ProductSource>, &'static rusty_money::iso::Currency), CliError> {
    if let Some(path) = &config.catalog.catalog_file {
        debug!(path = %path.display(), "loading catalog file");

        let catalog = Catalog::from_path(path)?;
        let currency = catalog.currency().unwrap_or(config.catalog.currency);

        return Ok((Arc::new(catalog), currency));
    }

    Ok((
        Arc::new(HttpProductSource::new(
            config.catalog.product_api_base_url.clone(),
            config.catalog.currency,
        )),
        config.catalog.currency,
    ))
}

async fn run_checkout(
    config: &StorefrontConfig,
    source: &dyn ProductSource,
    currency: &'static rusty_money::iso::Currency,
    args: CheckoutArgs,
) -> Result<(), CliError> {
    let toasts = ToastQueue::with_default_duration(config.checkout.toast_duration());
    let mut printer = ToastPrinter::default();
    let mut cart = Cart::with_tax_rate(currency, config.checkout.tax_rate);

    for spec in &args.items {
        let product = source.get_product(spec.id).await?;

        cart.add_item(&product, spec.quantity)?;

        toasts.show(format!("{} added to cart", product.name), None);
        printer.render(&toasts, io::stderr().lock())?;
    }

    write_cart_summary(io::stdout().lock(), &cart)?;

    if args.dry_run {
        info!("dry run, order not submitted");

        return Ok(());
    }

    let submitter = HttpOrderSubmitter::new(config.catalog.product_api_base_url.clone());

    let details = OrderDetails {
        email: args.email,
        address: args.address,
        note: args.note,
    };

    let order = checkout(&mut cart, details, &submitter).await?;

    toasts.show("Order placed", None);
    printer.render(&toasts, io::stderr().lock())?;

    writeln!(
        io::stdout().lock(),
        "Order placed for {} ({} lines)",
        order.email(),
        order.items().len()
    )?;

    Ok(())
}

fn write_product(mut out: impl Write, product: &Product) -> io::Result<()> {
    writeln!(out, "#{} {}", product.id, product.name)?;
    writeln!(out, "  Price: {}", product.price)?;
    writeln!(out, "  Stock: {}", product.stock)?;

    if let Some(description) = &product.description {
        writeln!(out, "  {description}")?;
    }

    if let Some(image) = &product.featured_image {
        writeln!(out, "  Image: {image}")?;
    }

    Ok(())
}

/// Prints each toast once, the first time it is seen on the queue.
#[derive(Debug, Default)]
struct ToastPrinter {
    seen: FxHashSet<ToastKey>,
}

impl ToastPrinter {
    fn render(&mut self, toasts: &ToastQueue, mut out: impl Write) -> io::Result<()> {
        for toast in toasts.active() {
            if self.seen.insert(toast.key()) {
                writeln!(out, "» {}", toast.message())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn products_command_accepts_search() -> TestResult {
        let cli = Cli::try_parse_from(["storefront", "products", "--search", "lamp"])?;

        let Commands::Products(args) = cli.command else {
            return Err("expected products command".into());
        };

        assert_eq!(args.search.as_deref(), Some("lamp"));

        Ok(())
    }

    #[test]
    fn item_spec_defaults_quantity_to_one() -> TestResult {
        let spec: ItemSpec = "12".parse()?;

        assert_eq!(spec.id, ProductId::new(12));
        assert_eq!(spec.quantity, 1);

        Ok(())
    }

    #[test]
    fn item_spec_parses_quantity() -> TestResult {
        let spec: ItemSpec = "3x4".parse()?;

        assert_eq!(spec.id, ProductId::new(3));
        assert_eq!(spec.quantity, 4);

        Ok(())
    }

    #[test]
    fn item_spec_rejects_zero_and_garbage() {
        assert!("3x0".parse::<ItemSpec>().is_err());
        assert!("lamp".parse::<ItemSpec>().is_err());
        assert!("3x".parse::<ItemSpec>().is_err());
    }

    #[test]
    fn checkout_command_parses() -> TestResult {
        let cli = Cli::try_parse_from([
            "storefront",
            "checkout",
            "--item",
            "1x2",
            "--item",
            "4",
            "--email",
            "ada@example.com",
            "--address",
            "1 Analytical Row",
            "--dry-run",
        ])?;

        let Commands::Checkout(args) = cli.command else {
            return Err("expected checkout command".into());
        };

        assert_eq!(args.items.len(), 2);
        assert!(args.dry_run);
        assert_eq!(args.note, "");

        Ok(())
    }

    #[tokio::test]
    async fn toast_printer_prints_each_toast_once() -> TestResult {
        let toasts = ToastQueue::new();
        let mut printer = ToastPrinter::default();
        let mut out = Vec::new();

        toasts.show("Lamp added to cart", None);
        printer.render(&toasts, &mut out)?;
        toasts.show("Rug added to cart", None);
        printer.render(&toasts, &mut out)?;

        assert_eq!(
            String::from_utf8(out)?,
            "» Lamp added to cart\n» Rug added to cart\n"
        );

        Ok(())
    }

    #[test]
    fn write_product_includes_optional_fields() -> TestResult {
        let product = Product {
            id: ProductId::new(2),
            name: "Rug".to_string(),
            description: Some("Wool".to_string()),
            stock: 1,
            price: rusty_money::Money::from_minor(500, rusty_money::iso::GBP),
            featured_image: Some("rug.png".to_string()),
        };

        let mut out = Vec::new();
        write_product(&mut out, &product)?;

        let output = String::from_utf8(out)?;
        assert!(output.contains("#2 Rug"));
        assert!(output.contains("Wool"));
        assert!(output.contains("rug.png"));

        Ok(())
    }
}
