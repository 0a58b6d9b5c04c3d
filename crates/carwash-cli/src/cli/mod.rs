//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use carwash_core::domain::{Cedula, Plate, ServiceId, TariffId, TicketId};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "carwash",
    bin_name = "carwash",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Car-wash and parking billing for front-desk staff",
    long_about = "carwash manages clients, vehicles and the service catalog, \
                  assigns car-wash services to vehicles and issues car-wash \
                  and parking invoices through the shop's billing API.",
    after_help = "EXAMPLES:\n\
        \x20 carwash clients list\n\
        \x20 carwash assign ABC123 --service 3 --service 4\n\
        \x20 carwash invoice car-wash ABC123\n\
        \x20 carwash invoice parking --ticket 18 --tariff 1 --entry 2024-05-01T09:00:00Z\n\
        \x20 carwash --offline dashboard",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage clients.
    #[command(subcommand, visible_alias = "c")]
    Clients(ClientCommands),

    /// Manage vehicles.
    #[command(subcommand, visible_alias = "v")]
    Vehicles(VehicleCommands),

    /// Manage parking tariffs.
    #[command(subcommand)]
    Tariffs(TariffCommands),

    /// Manage the car-wash service catalog.
    #[command(subcommand)]
    Services(ServiceCommands),

    /// Assign car-wash services to a vehicle.
    #[command(after_help = "EXAMPLES:\n\
        \x20 carwash assign ABC123 --service 3\n\
        \x20 carwash assign ABC123 -s 3 -s 4 -s 5\n\n\
        Exits with code 2 when some services could not be assigned; \
        re-run with only the failed ids.")]
    Assign(AssignArgs),

    /// Issue an invoice.
    #[command(subcommand)]
    Invoice(InvoiceCommands),

    /// List issued invoices.
    #[command(subcommand)]
    Invoices(InvoicesCommands),

    /// Show every section at once.
    #[command(visible_alias = "dash")]
    Dashboard,

    /// Initialise a configuration file.
    #[command(after_help = "EXAMPLES:\n\
        \x20 carwash init           # platform config location\n\
        \x20 carwash init --local   # ./carwash.toml")]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(after_help = "EXAMPLES:\n\
        \x20 carwash completions bash > ~/.local/share/bash-completion/completions/carwash\n\
        \x20 carwash completions zsh  > ~/.zfunc/_carwash\n\
        \x20 carwash completions fish > ~/.config/fish/completions/carwash.fish")]
    Completions(CompletionsArgs),

    /// Inspect the effective configuration.
    #[command(subcommand, after_help = "EXAMPLES:\n\
        \x20 carwash config get api.base_url\n\
        \x20 carwash config list\n\
        \x20 carwash config path")]
    Config(ConfigCommands),
}

// ── records ───────────────────────────────────────────────────────────────────

/// Confirmation override shared by every delete.
#[derive(Debug, Clone, Copy, Args)]
pub struct ConfirmArgs {
    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Delete without asking")]
    pub yes: bool,
}

#[derive(Debug, Subcommand)]
pub enum ClientCommands {
    /// List clients and how many vehicles each owns.
    #[command(visible_alias = "ls")]
    List,
    /// Register a client.
    Add(ClientFields),
    /// Change a client's details. The cedula cannot change.
    Edit(ClientEdit),
    /// Delete a client that owns no vehicles.
    #[command(visible_alias = "rm")]
    Delete {
        cedula: Cedula,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}

#[derive(Debug, Args)]
pub struct ClientFields {
    #[arg(long)]
    pub cedula: Cedula,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub address: String,
}

#[derive(Debug, Args)]
pub struct ClientEdit {
    pub cedula: Cedula,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum VehicleCommands {
    /// List vehicles with their owners.
    #[command(visible_alias = "ls")]
    List,
    /// Register a vehicle.
    Add(VehicleFields),
    /// Change a vehicle's details. The plate cannot change.
    Edit(VehicleEdit),
    /// Delete a vehicle.
    #[command(visible_alias = "rm")]
    Delete {
        plate: Plate,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}

#[derive(Debug, Args)]
pub struct VehicleFields {
    #[arg(long)]
    pub plate: Plate,
    #[arg(long)]
    pub make: String,
    #[arg(long)]
    pub model: String,
    #[arg(long)]
    pub color: String,
    /// Cedula of the owning client.
    #[arg(long)]
    pub owner: Cedula,
}

#[derive(Debug, Args)]
pub struct VehicleEdit {
    pub plate: Plate,
    #[arg(long)]
    pub make: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub owner: Option<Cedula>,
}

// ── catalog ───────────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum TariffCommands {
    /// List parking tariffs.
    #[command(visible_alias = "ls")]
    List,
    /// Create a tariff.
    Add(TariffFields),
    /// Change a tariff.
    Edit(TariffEdit),
    /// Delete a tariff no parking invoice references.
    #[command(visible_alias = "rm")]
    Delete {
        id: TariffId,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}

#[derive(Debug, Args)]
pub struct TariffFields {
    /// Vehicle category the tariff applies to, e.g. "Carro".
    #[arg(long = "vehicle-type")]
    pub vehicle_type: String,
    /// Price per hour.
    #[arg(long)]
    pub rate: Decimal,
    /// Billing step in hours, e.g. 0.25 for quarter hours.
    #[arg(long)]
    pub fraction: Decimal,
}

#[derive(Debug, Args)]
pub struct TariffEdit {
    pub id: TariffId,
    #[arg(long = "vehicle-type")]
    pub vehicle_type: Option<String>,
    #[arg(long)]
    pub rate: Option<Decimal>,
    #[arg(long)]
    pub fraction: Option<Decimal>,
}

#[derive(Debug, Subcommand)]
pub enum ServiceCommands {
    /// List car-wash services.
    #[command(visible_alias = "ls")]
    List,
    /// Create a service.
    Add(ServiceFields),
    /// Change a service. Issued invoices keep their old price.
    Edit(ServiceEdit),
    /// Delete a service no unbilled assignment references.
    #[command(visible_alias = "rm")]
    Delete {
        id: ServiceId,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}

#[derive(Debug, Args)]
pub struct ServiceFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub price: Decimal,
}

#[derive(Debug, Args)]
pub struct ServiceEdit {
    pub id: ServiceId,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub price: Option<Decimal>,
}

// ── workflows ─────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AssignArgs {
    /// Plate of the vehicle to assign services to.
    pub plate: Plate,

    /// Service id; repeat for several services.
    #[arg(short = 's', long = "service", value_name = "ID", required = true)]
    pub services: Vec<ServiceId>,
}

#[derive(Debug, Subcommand)]
pub enum InvoiceCommands {
    /// Invoice every unbilled service of a vehicle.
    CarWash {
        plate: Plate,
    },
    /// Invoice a parking stay.
    Parking(ParkingArgs),
}

#[derive(Debug, Args)]
pub struct ParkingArgs {
    #[arg(long)]
    pub ticket: TicketId,

    #[arg(long)]
    pub tariff: TariffId,

    /// Entry time, RFC 3339 (e.g. 2024-05-01T09:00:00Z).
    #[arg(long)]
    pub entry: DateTime<Utc>,

    /// Exit time, RFC 3339. Defaults to now.
    #[arg(long)]
    pub exit: Option<DateTime<Utc>>,

    /// Plate printed on the receipt.
    #[arg(long)]
    pub plate: Option<Plate>,
}

#[derive(Debug, Subcommand)]
pub enum InvoicesCommands {
    /// List issued invoices.
    #[command(visible_alias = "ls")]
    List {
        #[arg(long, value_enum)]
        kind: Option<InvoiceKind>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InvoiceKind {
    CarWash,
    Parking,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `carwash init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `carwash.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `carwash completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `carwash config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `api.base_url`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
