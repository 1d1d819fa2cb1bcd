use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Push pending rows of one entity, or all of them, to the ERP
    Sync {
        #[arg(
            long,
            required_unless_present = "all",
            conflicts_with = "all",
            help = "Entity to sync: clients, orders, order-items or serial-numbers"
        )]
        entity: Option<String>,

        #[arg(long, help = "Sync every entity in dependency order")]
        all: bool,

        #[arg(
            long,
            help = "When to authenticate: per-record (default) or per-run"
        )]
        token_policy: Option<String>,

        #[arg(
            long,
            help = "If specified, writes the JSON summaries to this file"
        )]
        output: Option<String>,

        #[arg(long, help = "Print the JSON summaries to stdout")]
        report: bool,
    },
    /// Load the IBGE municipality list into the ERP
    Municipalities {
        #[arg(long, help = "Records per batch request (default 500)")]
        chunk_size: Option<usize>,

        #[arg(
            long,
            help = "If specified, writes the JSON summary to this file"
        )]
        output: Option<String>,

        #[arg(long, help = "Print the JSON summary to stdout")]
        report: bool,
    },
    /// Print the built-in entity catalog as JSON
    Entities,
    /// Check connectivity to MySQL or the ERP
    TestConn {
        /// Target: "mysql" or "erp"
        #[arg(long)]
        target: String,
    },
}
