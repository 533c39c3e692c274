use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use contract_bindings::{
    admin_status,
    config::validate_private_key,
    contract::{GasPriceOracleEvents, StakingEvents, WalletManagerEvents},
    create2::predict_account_address,
    opts, AdminControls, Config, FilterOpts, Filterer, GasPriceOracle, Staking, TransactOpts,
    WalletManager, WatchOpts,
};
use dialoguer::Input;
use ethers::{
    abi::Detokenize,
    contract::{builders::ContractCall, EthLogDecode},
    prelude::*,
    providers::{Http, Provider},
    utils::{format_ether, format_units, parse_ether, parse_units},
};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::{fmt::Debug, sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

#[derive(Parser)]
#[command(
    name = "bindings-cli",
    version,
    about = "GasPriceOracle / Staking / WalletManager 合约客户端"
)]
struct Cli {
    /// RPC 节点地址，优先于 RPC_URL
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// 交易确认块数，优先于 CONFIRMATIONS
    #[arg(long, global = true)]
    confirmations: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Gas 价格预言机
    #[command(subcommand)]
    Oracle(OracleCommand),
    /// 质押合约
    #[command(subcommand)]
    Staking(StakingCommand),
    /// 智能账户工厂
    #[command(subcommand)]
    Wallet(WalletCommand),
    /// 所有权 / 暂停 / 升级
    #[command(subcommand)]
    Admin(AdminCommand),
    /// 查询历史事件
    Events {
        #[arg(value_enum)]
        contract: ContractKind,
        #[arg(long, default_value_t = 0)]
        from_block: u64,
        #[arg(long)]
        to_block: Option<u64>,
    },
    /// 实时监听事件，Ctrl-C 退出
    Watch {
        #[arg(value_enum)]
        contract: ContractKind,
        #[arg(long)]
        from_block: Option<u64>,
        /// 落后链头的区块数，只处理已确认区块
        #[arg(long = "lag", id = "lag", default_value_t = 0)]
        lag_blocks: u64,
    },
}

#[derive(Subcommand)]
enum OracleCommand {
    /// 当前价格与有效性
    Price,
    /// 提交新价格（单位 gwei）
    Update { price_gwei: String },
    /// 设置兜底价格（单位 gwei）
    SetFallback { price_gwei: String },
}

#[derive(Subcommand)]
enum StakingCommand {
    /// 查询地址的质押状态
    Position { user: String },
    /// 奖励曲线参数
    Schedule,
    /// 质押（单位 ether）
    Stake { amount: String },
    /// 解除质押（单位 ether）
    Unstake { amount: String },
    /// 领取奖励
    Claim,
}

#[derive(Subcommand)]
enum WalletCommand {
    /// 查询 (owner, salt) 对应的账户地址
    Address { owner: String, salt: String },
    /// 部署账户
    Create { owner: String, salt: String },
    /// 本地计算账户地址，不连接节点
    Predict {
        owner: String,
        salt: String,
        #[arg(long)]
        implementation: String,
        /// ERC1967Proxy 的 creation code (hex)
        #[arg(long)]
        proxy_bytecode: String,
    },
}

#[derive(Subcommand)]
enum AdminCommand {
    /// 不指定合约时显示全部已配置合约
    Status {
        #[arg(value_enum)]
        contract: Option<ContractKind>,
    },
    Pause {
        #[arg(value_enum)]
        contract: ContractKind,
    },
    Unpause {
        #[arg(value_enum)]
        contract: ContractKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ContractKind {
    Oracle,
    Staking,
    Wallet,
}

impl ContractKind {
    const ALL: [ContractKind; 3] = [
        ContractKind::Oracle,
        ContractKind::Staking,
        ContractKind::Wallet,
    ];

    fn name(&self) -> &'static str {
        match self {
            ContractKind::Oracle => "GasPriceOracle",
            ContractKind::Staking => "Staking",
            ContractKind::Wallet => "WalletManager",
        }
    }

    fn address(&self, config: &Config) -> Option<Address> {
        match self {
            ContractKind::Oracle => config.oracle_address,
            ContractKind::Staking => config.staking_address,
            ContractKind::Wallet => config.wallet_manager_address,
        }
    }

    fn require_address(&self, config: &Config) -> Result<Address> {
        self.address(config).ok_or_else(|| {
            anyhow!(
                "未配置 {} 合约地址 / {} address is not configured",
                self.name(),
                self.name()
            )
        })
    }

    fn admin<M: Middleware + 'static>(
        &self,
        address: Address,
        client: Arc<M>,
    ) -> Box<dyn AdminControls<M>> {
        match self {
            ContractKind::Oracle => Box::new(GasPriceOracle::new(address, client)),
            ContractKind::Staking => Box::new(Staking::new(address, client)),
            ContractKind::Wallet => Box::new(WalletManager::new(address, client)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(confirmations) = cli.confirmations {
        config.confirmations = confirmations;
    }

    // 纯本地计算，不需要节点
    if let Command::Wallet(WalletCommand::Predict {
        owner,
        salt,
        implementation,
        proxy_bytecode,
    }) = &cli.command
    {
        return predict_account(&config, owner, salt, implementation, proxy_bytecode);
    }

    let rpc_url = resolve_rpc_url(cli.rpc_url.clone(), &config)?;
    println!("{}", format!("已选择 RPC / Selected RPC: {}", rpc_url).green());
    let provider = Provider::<Http>::try_from(rpc_url.as_str())?;

    // 显示链ID信息
    match provider.get_chainid().await {
        Ok(chain_id) => {
            println!(
                "{}",
                format!("连接到链ID: {} / Connected to chain ID: {}", chain_id, chain_id).green()
            );
            if let Some(expected) = config.chain_id {
                if chain_id != U256::from(expected) {
                    println!(
                        "{}",
                        "警告：检测到的链ID与设置的不符！ / Warning: Detected chain ID does not match configuration!"
                            .yellow()
                    );
                }
            }
        }
        Err(e) => {
            println!(
                "{}",
                format!("无法获取链ID: {} / Could not get chain ID: {}", e, e).yellow()
            );
        }
    }

    match cli.command {
        Command::Oracle(command) => run_oracle(command, &config, provider).await,
        Command::Staking(command) => run_staking(command, &config, provider).await,
        Command::Wallet(command) => run_wallet(command, &config, provider).await,
        Command::Admin(command) => run_admin(command, &config, provider).await,
        Command::Events {
            contract,
            from_block,
            to_block,
        } => {
            let filterer = Filterer::new(Arc::new(provider), contract.require_address(&config)?);
            let opts = FilterOpts {
                from_block,
                to_block,
                chunk_size: config.log_chunk_size,
                topic1: None,
            };
            match contract {
                ContractKind::Oracle => {
                    print_events::<_, GasPriceOracleEvents>(&filterer, &opts).await
                }
                ContractKind::Staking => print_events::<_, StakingEvents>(&filterer, &opts).await,
                ContractKind::Wallet => {
                    print_events::<_, WalletManagerEvents>(&filterer, &opts).await
                }
            }
        }
        Command::Watch {
            contract,
            from_block,
            lag_blocks,
        } => {
            let filterer = Filterer::new(Arc::new(provider), contract.require_address(&config)?);
            let opts = WatchOpts {
                from_block,
                poll_interval: config.poll_interval,
                confirmations: lag_blocks,
                chunk_size: config.log_chunk_size,
                topic1: None,
                skip_unknown: true,
            };
            match contract {
                ContractKind::Oracle => {
                    watch_events::<_, GasPriceOracleEvents>(filterer, opts).await
                }
                ContractKind::Staking => watch_events::<_, StakingEvents>(filterer, opts).await,
                ContractKind::Wallet => {
                    watch_events::<_, WalletManagerEvents>(filterer, opts).await
                }
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,contract_bindings=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn resolve_rpc_url(flag: Option<String>, config: &Config) -> Result<String> {
    if let Some(url) = flag.or_else(|| config.rpc_url.clone()) {
        return Ok(url);
    }
    let url: String = Input::new()
        .with_prompt("请输入 RPC 地址 / Enter RPC URL")
        .interact_text()?;
    Ok(url)
}

fn prompt_private_key() -> Result<String> {
    let private_key: String = Input::new()
        .with_prompt("\n请输入私钥 / Enter private key (starts with 0x)")
        .validate_with(|input: &String| -> Result<(), &str> {
            if validate_private_key(input) {
                Ok(())
            } else {
                Err("私钥格式错误：需以0x开头，后面跟64位十六进制字符 / Invalid private key: Must start with 0x followed by 64 hexadecimal characters")
            }
        })
        .interact()?;
    Ok(private_key)
}

async fn signer_client(provider: Provider<Http>, config: &Config) -> Result<Arc<SignerClient>> {
    let private_key = match &config.private_key {
        Some(key) => key.clone(),
        None => prompt_private_key()?,
    };
    let chain_id = match config.chain_id {
        Some(chain_id) => chain_id,
        None => provider.get_chainid().await?.as_u64(),
    };

    let wallet = private_key
        .parse::<LocalWallet>()
        .map_err(|e| anyhow!("私钥解析错误 / Private key parsing error: {}", e))?
        .with_chain_id(chain_id);
    println!(
        "{}",
        format!("钱包地址 / Wallet address: {:?}", wallet.address()).green()
    );

    let balance = provider.get_balance(wallet.address(), None).await?;
    println!(
        "{}",
        format!("当前余额 / Current balance: {} ETH", format_ether(balance)).green()
    );

    Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}

fn transact_opts(config: &Config) -> TransactOpts {
    TransactOpts::default().with_confirmations(config.confirmations)
}

/// 发送交易，等待期间显示进度
async fn send_with_spinner<M, D>(
    label: &str,
    call: ContractCall<M, D>,
    opts: &TransactOpts,
) -> Result<TransactionReceipt>
where
    M: Middleware,
    D: Detokenize,
{
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!(
        "{}: 交易已发送，等待确认 / waiting for confirmation...",
        label
    ));

    let result = opts::transact(call, opts).await;
    pb.finish_and_clear();

    match result {
        Ok(receipt) => {
            println!(
                "{}",
                format!(
                    "{}: 交易成功 / Transaction confirmed, 交易哈希 / Transaction hash: {:?}",
                    label, receipt.transaction_hash
                )
                .green()
            );
            Ok(receipt)
        }
        Err(e) => {
            println!(
                "{}",
                format!("{}: 交易失败 / Transaction failed: {}", label, e).red()
            );
            Err(e.into())
        }
    }
}

fn parse_address(value: &str) -> Result<Address> {
    value
        .parse::<Address>()
        .map_err(|e| anyhow!("无效地址 / Invalid address {}: {:?}", value, e))
}

fn parse_salt(value: &str) -> Result<U256> {
    if let Some(hex_salt) = value.strip_prefix("0x") {
        return U256::from_str_radix(hex_salt, 16)
            .map_err(|e| anyhow!("无效 salt / Invalid salt {}: {:?}", value, e));
    }
    U256::from_dec_str(value).map_err(|e| anyhow!("无效 salt / Invalid salt {}: {:?}", value, e))
}

fn gwei(value: &str) -> Result<U256> {
    Ok(parse_units(value, "gwei")?.into())
}

/// 链上秒级时间戳转为 RFC 3339，超出 i64 范围时原样输出
fn timestamp(value: U256) -> String {
    if value > U256::from(i64::MAX) {
        return value.to_string();
    }
    i64::try_from(value.as_u64())
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| value.to_string())
}

async fn run_oracle(
    command: OracleCommand,
    config: &Config,
    provider: Provider<Http>,
) -> Result<()> {
    let address = ContractKind::Oracle.require_address(config)?;

    match command {
        OracleCommand::Price => {
            let oracle = GasPriceOracle::new(address, Arc::new(provider));
            let snapshot = oracle.snapshot().await?;
            let now = chrono::Utc::now().timestamp().max(0) as u64;

            let price = format_units(snapshot.price, "gwei")?;
            let fallback_price = format_units(snapshot.fallback_price, "gwei")?;
            println!("{}", format!("当前价格 / Price: {} gwei", price).cyan());
            println!(
                "{}",
                format!("更新时间 / Updated at: {}", timestamp(snapshot.updated_at)).cyan()
            );
            println!(
                "{}",
                format!("兜底价格 / Fallback price: {} gwei", fallback_price).cyan()
            );
            println!(
                "{}",
                format!(
                    "偏差阈值 / Deviation threshold: {} bps",
                    snapshot.deviation_threshold_bps
                )
                .cyan()
            );
            println!(
                "{}",
                format!("最大有效期 / Max price age: {} s", snapshot.max_price_age).cyan()
            );

            if !snapshot.is_valid {
                println!(
                    "{}",
                    "价格无效，合约将使用兜底价格 / Price invalid, contract falls back".yellow()
                );
            } else if snapshot.is_stale(now) {
                let age = snapshot.age(now);
                println!(
                    "{}",
                    format!("价格已过期 {} 秒 / Price is stale ({} s old)", age, age).yellow()
                );
            } else {
                println!("{}", "价格有效 / Price is valid".green());
            }
        }
        OracleCommand::Update { price_gwei } => {
            let client = signer_client(provider, config).await?;
            let oracle = GasPriceOracle::new(address, client);
            let call = oracle.update_price(gwei(&price_gwei)?);
            send_with_spinner("updatePrice", call, &transact_opts(config)).await?;
        }
        OracleCommand::SetFallback { price_gwei } => {
            let client = signer_client(provider, config).await?;
            let oracle = GasPriceOracle::new(address, client);
            let call = oracle.set_fallback_price(gwei(&price_gwei)?);
            send_with_spinner("setFallbackPrice", call, &transact_opts(config)).await?;
        }
    }
    Ok(())
}

async fn run_staking(
    command: StakingCommand,
    config: &Config,
    provider: Provider<Http>,
) -> Result<()> {
    let address = ContractKind::Staking.require_address(config)?;

    match command {
        StakingCommand::Position { user } => {
            let staking = Staking::new(address, Arc::new(provider));
            let position = staking.position(parse_address(&user)?).await?;

            if !position.has_stake() {
                println!("{}", "该地址没有质押 / No stake for this address".yellow());
            }
            println!(
                "{}",
                format!("质押数量 / Staked: {}", format_ether(position.amount)).cyan()
            );
            println!(
                "{}",
                format!("质押时间 / Staked at: {}", timestamp(position.staked_at)).cyan()
            );
            println!(
                "{}",
                format!("上次领取 / Last claim: {}", timestamp(position.last_claim_at)).cyan()
            );
            println!(
                "{}",
                format!(
                    "待领取奖励 / Pending rewards: {}",
                    format_ether(position.pending_rewards)
                )
                .green()
            );
            println!(
                "{}",
                format!(
                    "连击次数 / Combo count: {} (可获得加成 / eligible: {})",
                    position.combo_count, position.combo_eligible
                )
                .cyan()
            );
        }
        StakingCommand::Schedule => {
            let staking = Staking::new(address, Arc::new(provider));
            let schedule = staking.schedule().await?;

            println!(
                "{}",
                format!("基础奖励率 / Base reward rate: {}", schedule.base_reward_rate).cyan()
            );
            println!(
                "{}",
                format!(
                    "当前奖励率 / Current reward rate: {}",
                    schedule.current_reward_rate
                )
                .cyan()
            );
            println!(
                "{}",
                format!("当前季度 / Current quarter: {}", schedule.current_quarter).cyan()
            );
            println!(
                "{}",
                format!(
                    "季度衰减 / Quarterly decay: {} bps",
                    schedule.quarterly_decay_bps
                )
                .cyan()
            );
            println!(
                "{}",
                format!(
                    "连击加成 / Combo bonus: {} bps, 窗口 / window: {} s, 上限 / max: {}",
                    schedule.combo_bonus_bps, schedule.combo_window, schedule.max_combo_count
                )
                .cyan()
            );
            println!(
                "{}",
                format!(
                    "总质押量 / Total staked: {}",
                    format_ether(schedule.total_staked)
                )
                .cyan()
            );
        }
        StakingCommand::Stake { amount } => {
            let client = signer_client(provider, config).await?;
            let staking = Staking::new(address, client);
            let call = staking.stake(parse_ether(&amount)?);
            send_with_spinner("stake", call, &transact_opts(config)).await?;
        }
        StakingCommand::Unstake { amount } => {
            let client = signer_client(provider, config).await?;
            let staking = Staking::new(address, client);
            let call = staking.unstake(parse_ether(&amount)?);
            send_with_spinner("unstake", call, &transact_opts(config)).await?;
        }
        StakingCommand::Claim => {
            let client = signer_client(provider, config).await?;
            let staking = Staking::new(address, client);
            let pending = staking
                .pending_rewards(staking.client().address())
                .call()
                .await?;
            println!(
                "{}",
                format!("待领取奖励 / Pending rewards: {}", format_ether(pending)).cyan()
            );
            let call = staking.claim_rewards();
            send_with_spinner("claimRewards", call, &transact_opts(config)).await?;
        }
    }
    Ok(())
}

async fn run_wallet(
    command: WalletCommand,
    config: &Config,
    provider: Provider<Http>,
) -> Result<()> {
    let address = ContractKind::Wallet.require_address(config)?;

    match command {
        WalletCommand::Address { owner, salt } => {
            let manager = WalletManager::new(address, Arc::new(provider));
            let lookup = manager
                .lookup_account(parse_address(&owner)?, parse_salt(&salt)?)
                .await?;

            println!(
                "{}",
                format!("账户地址 / Account address: {:?}", lookup.address).cyan()
            );
            if lookup.deployed {
                println!("{}", "已部署 / Deployed".green());
            } else {
                println!("{}", "尚未部署 / Not deployed yet".yellow());
            }
        }
        WalletCommand::Create { owner, salt } => {
            let owner = parse_address(&owner)?;
            let salt = parse_salt(&salt)?;
            let client = signer_client(provider, config).await?;
            let manager = WalletManager::new(address, client);

            let lookup = manager.lookup_account(owner, salt).await?;
            if lookup.deployed {
                println!(
                    "{}",
                    format!("账户已存在 / Account already deployed: {:?}", lookup.address).yellow()
                );
                return Ok(());
            }
            let call = manager.create_account(owner, salt);
            send_with_spinner("createAccount", call, &transact_opts(config)).await?;
            println!(
                "{}",
                format!("账户地址 / Account address: {:?}", lookup.address).green()
            );
        }
        WalletCommand::Predict {
            owner,
            salt,
            implementation,
            proxy_bytecode,
        } => predict_account(config, &owner, &salt, &implementation, &proxy_bytecode)?,
    }
    Ok(())
}

fn predict_account(
    config: &Config,
    owner: &str,
    salt: &str,
    implementation: &str,
    proxy_bytecode: &str,
) -> Result<()> {
    let factory = ContractKind::Wallet.require_address(config)?;
    let proxy_code = hex::decode(proxy_bytecode.trim_start_matches("0x"))
        .context("无效 bytecode / invalid proxy bytecode")?;
    let predicted = predict_account_address(
        factory,
        &proxy_code,
        parse_address(implementation)?,
        parse_address(owner)?,
        parse_salt(salt)?,
    );
    println!(
        "{}",
        format!("预测地址 / Predicted address: {:?}", predicted).green()
    );
    Ok(())
}

async fn run_admin(command: AdminCommand, config: &Config, provider: Provider<Http>) -> Result<()> {
    match command {
        AdminCommand::Status { contract } => {
            let kinds: Vec<ContractKind> = match contract {
                Some(kind) => vec![kind],
                None => ContractKind::ALL
                    .into_iter()
                    .filter(|kind| kind.address(config).is_some())
                    .collect(),
            };
            if kinds.is_empty() {
                return Err(anyhow!(
                    "没有已配置的合约地址 / No contract addresses configured"
                ));
            }

            let client = Arc::new(provider);
            let mut bindings = Vec::new();
            for kind in &kinds {
                bindings.push(kind.admin(kind.require_address(config)?, client.clone()));
            }
            let results = join_all(
                bindings
                    .iter()
                    .map(|binding| admin_status::<Provider<Http>, _>(&**binding)),
            )
            .await;

            for (kind, result) in kinds.iter().zip(results) {
                match result {
                    Ok(status) => {
                        println!("{}", format!("{} ({:?})", kind.name(), status.address).bold());
                        println!("{}", format!("  所有者 / Owner: {:?}", status.owner).cyan());
                        println!(
                            "{}",
                            format!("  实现合约 / Implementation: {:?}", status.implementation)
                                .cyan()
                        );
                        if status.paused {
                            println!("{}", "  已暂停 / Paused".yellow());
                        } else {
                            println!("{}", "  运行中 / Active".green());
                        }
                    }
                    Err(e) => {
                        println!(
                            "{}",
                            format!("{}: 查询失败 / Query failed: {}", kind.name(), e).red()
                        );
                    }
                }
            }
        }
        AdminCommand::Pause { contract } => {
            let client = signer_client(provider, config).await?;
            let binding = contract.admin(contract.require_address(config)?, client);
            send_with_spinner("pause", binding.admin_pause(), &transact_opts(config)).await?;
        }
        AdminCommand::Unpause { contract } => {
            let client = signer_client(provider, config).await?;
            let binding = contract.admin(contract.require_address(config)?, client);
            send_with_spinner("unpause", binding.admin_unpause(), &transact_opts(config)).await?;
        }
    }
    Ok(())
}

async fn print_events<M, D>(filterer: &Filterer<M>, opts: &FilterOpts) -> Result<()>
where
    M: Middleware + 'static,
    D: EthLogDecode + Debug,
{
    let logs = filterer.all_logs::<D>(opts).await?;
    println!(
        "{}",
        format!("共 {} 条日志 / {} logs found", logs.len(), logs.len()).bold()
    );

    for item in logs {
        match item {
            Ok(log) => println!(
                "{}",
                format!(
                    "[#{}] {:?} tx={:?}",
                    log.block_number().unwrap_or_default(),
                    log.event,
                    log.transaction_hash().unwrap_or_default()
                )
                .cyan()
            ),
            Err(e) => println!(
                "{}",
                format!("无法解码的日志 / Undecodable log: {}", e).yellow()
            ),
        }
    }
    Ok(())
}

async fn watch_events<M, D>(filterer: Filterer<M>, opts: WatchOpts) -> Result<()>
where
    M: Middleware + 'static,
    D: EthLogDecode + Debug + Send + 'static,
{
    let (sink, mut events) = mpsc::channel(64);
    let subscription = filterer.watch_all::<D>(sink, opts);
    let address = filterer.address();
    println!(
        "{}",
        format!(
            "开始监听 {:?}，按 Ctrl-C 退出 / Watching {:?}, press Ctrl-C to stop",
            address, address
        )
        .bold()
        .green()
    );

    loop {
        tokio::select! {
            received = events.recv() => match received {
                Some(log) => println!(
                    "{}",
                    format!("[#{}] {:?}", log.block_number().unwrap_or_default(), log.event).cyan()
                ),
                // 监听任务已结束，错误由 unsubscribe 返回
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                println!("{}", "正在停止监听 / Stopping...".yellow());
                break;
            }
        }
    }

    subscription.unsubscribe().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn watch_parses_without_flags() {
        let cli = Cli::try_parse_from(["bindings-cli", "watch", "staking"]).unwrap();
        assert!(cli.confirmations.is_none());
        match cli.command {
            Command::Watch {
                contract,
                from_block,
                lag_blocks,
            } => {
                assert_eq!(contract, ContractKind::Staking);
                assert_eq!(from_block, None);
                assert_eq!(lag_blocks, 0);
            }
            _ => panic!("expected watch"),
        }
    }

    #[test]
    fn watch_lag_is_separate_from_global_confirmations() {
        let cli = Cli::try_parse_from([
            "bindings-cli",
            "--confirmations",
            "2",
            "watch",
            "oracle",
            "--lag",
            "3",
            "--from-block",
            "100",
        ])
        .unwrap();
        assert_eq!(cli.confirmations, Some(2));
        match cli.command {
            Command::Watch {
                contract,
                from_block,
                lag_blocks,
            } => {
                assert_eq!(contract, ContractKind::Oracle);
                assert_eq!(from_block, Some(100));
                assert_eq!(lag_blocks, 3);
            }
            _ => panic!("expected watch"),
        }
    }

    #[test]
    fn global_confirmations_after_subcommand() {
        let cli =
            Cli::try_parse_from(["bindings-cli", "watch", "wallet", "--confirmations", "4"])
                .unwrap();
        assert_eq!(cli.confirmations, Some(4));
    }

    #[test]
    fn events_and_oracle_commands_parse() {
        let cli = Cli::try_parse_from([
            "bindings-cli",
            "events",
            "staking",
            "--from-block",
            "10",
            "--to-block",
            "20",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Events {
                contract: ContractKind::Staking,
                from_block: 10,
                to_block: Some(20),
            }
        ));

        let cli = Cli::try_parse_from(["bindings-cli", "--confirmations", "2", "oracle", "price"])
            .unwrap();
        assert_eq!(cli.confirmations, Some(2));
        assert!(matches!(cli.command, Command::Oracle(OracleCommand::Price)));
    }

    #[test]
    fn timestamp_formats_seconds() {
        assert_eq!(timestamp(U256::zero()), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn timestamp_out_of_range_prints_raw_value() {
        let huge = U256::from(u64::MAX);
        assert_eq!(timestamp(huge), huge.to_string());
        let wider = U256::from(u128::MAX);
        assert_eq!(timestamp(wider), wider.to_string());
        // 在 i64 范围内但超出 chrono 支持的年份
        let far = U256::from(i64::MAX);
        assert_eq!(timestamp(far), far.to_string());
    }

    #[test]
    fn salt_accepts_decimal_and_hex() {
        assert_eq!(parse_salt("42").unwrap(), U256::from(42));
        assert_eq!(parse_salt("0x2a").unwrap(), U256::from(42));
        assert!(parse_salt("salt").is_err());
    }
}
