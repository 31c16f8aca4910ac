//! MSMQ Message Client
//!
//! Reads, and optionally updates, properties of an `MSMQMessage` object
//! exported by a remote host. The object is addressed by its IPID, which
//! comes from an earlier activation (for example an `IRemoteSCMActivator`
//! exchange run by another tool).
//!
//! # Usage
//!
//! ```bash
//! # Print the label, priority and class of a message object
//! mqac-client --host 192.168.1.10 --port 49152 --ipid 0000a801-0f9c-0000-1c9e-3b6e7fd5b4c2
//!
//! # Set a new label first
//! mqac-client --ipid <IPID> --label "invoice 1042" --priority 5
//! ```

use clap::Parser;
use dcerpc::DceRpcClient;
use dcom::{CallOptions, ClientOptions, Ipid, RpcConn};
use midl_ndr::BString;
use mqac::imsmqmessage4::{
    GetClassRequest, GetLabelRequest, GetPriorityRequest, SetLabelRequest, SetPriorityRequest,
};
use mqac::{MessageClient, MESSAGE4_SYNTAX_V0_0};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 135;

#[derive(Parser, Debug)]
#[command(name = "mqac-client")]
#[command(version)]
#[command(about = "Inspect an MSMQ message object over DCOM")]
struct Args {
    /// Server host
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Server port of the object exporter
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// IPID of the IMSMQMessage4 interface
    #[arg(long)]
    ipid: Ipid,

    /// New message label
    #[arg(long)]
    label: Option<String>,

    /// New message priority (0-7)
    #[arg(long)]
    priority: Option<i32>,

    /// Per-call timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print values only
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if !args.quiet {
        let level = if args.verbose { Level::DEBUG } else { Level::WARN };
        let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    if !args.quiet {
        println!("Connecting to {}...", addr);
    }

    let rpc = DceRpcClient::connect(addr, MESSAGE4_SYNTAX_V0_0).await?;
    let conn = Arc::new(RpcConn::new(Arc::new(rpc)));
    let message = MessageClient::new(conn, ClientOptions::new().with_ipid(args.ipid)).await?;
    let opts = CallOptions::new().with_timeout(Duration::from_secs(args.timeout));

    if let Some(label) = args.label {
        let request = SetLabelRequest {
            label: Some(BString::from(label.as_str())),
            ..Default::default()
        };
        message.set_label(request, opts).await.into_result()?;
    }

    if let Some(priority) = args.priority {
        let request = SetPriorityRequest {
            priority,
            ..Default::default()
        };
        message.set_priority(request, opts).await.into_result()?;
    }

    let label = message
        .get_label(GetLabelRequest::default(), opts)
        .await
        .into_result()?
        .label;
    let priority = message
        .get_priority(GetPriorityRequest::default(), opts)
        .await
        .into_result()?
        .priority;
    let class = message
        .get_class(GetClassRequest::default(), opts)
        .await
        .into_result()?
        .class;

    let label = label.as_ref().map(|s| s.as_str()).unwrap_or("<null>");
    if args.quiet {
        println!("{}", label);
        println!("{}", priority);
        println!("{}", class);
    } else {
        println!("Label:    {}", label);
        println!("Priority: {}", priority);
        println!("Class:    {:#06x}", class);
    }

    Ok(())
}
