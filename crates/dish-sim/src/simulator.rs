//! Simulation driver.
//!
//! Four tokio tasks share one [`ShelfManager`]:
//! - the **producer** places one order per `1 / ordersPerSecond`, then
//!   waits out the drain grace period and signals stop;
//! - the **courier** walks the resident orders on every delivery tick and
//!   delivers each after a [`CourierPolicy`] delay;
//! - the **sweeper** discards expired orders;
//! - the **reporter** logs a progress line.
//!
//! Stop is broadcast on a `watch` channel. It fires when the producer
//! finishes, when the configured duration elapses, or when the caller's
//! shutdown future resolves.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use dish_core::{Clock, ManagerStats, Placement, ShelfManager, SystemClock};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::courier::{CourierPolicy, RandomDelay};
use crate::error::SimError;
use crate::orders::{load_orders, OrderSpec};
use crate::report;

/// Drives a shelf manager with a stream of orders and a courier.
pub struct Simulator {
    manager: Arc<ShelfManager>,
    config: SimConfig,
    specs: Arc<Vec<OrderSpec>>,
    courier: Arc<dyn CourierPolicy>,
}

/// State shared by the simulation tasks.
struct Shared {
    manager: Arc<ShelfManager>,
    config: SimConfig,
    specs: Arc<Vec<OrderSpec>>,
    courier: Arc<dyn CourierPolicy>,
    stop: watch::Sender<bool>,
}

impl Simulator {
    /// Validate `config` and build a manager with the configured capacities.
    ///
    /// The courier waits a random `courierMinDelaySecs..=courierMaxDelaySecs`
    /// before each delivery.
    pub fn new(config: SimConfig, specs: Vec<OrderSpec>) -> Result<Self, SimError> {
        config.validate()?;
        let manager = ShelfManager::with_clock(config.capacities(), Arc::new(SystemClock));
        let courier =
            RandomDelay::new(config.courier_min_delay_secs, config.courier_max_delay_secs);
        Ok(Self {
            manager: Arc::new(manager),
            config,
            specs: Arc::new(specs),
            courier: Arc::new(courier),
        })
    }

    /// Load the config (defaults if absent) and the order definitions.
    pub fn from_files(
        config_path: impl AsRef<Path>,
        orders_path: impl AsRef<Path>,
    ) -> Result<Self, SimError> {
        let config = SimConfig::load(config_path)?;
        let specs = load_orders(orders_path)?;
        Self::new(config, specs)
    }

    /// Replace the courier timing policy.
    pub fn with_courier(mut self, courier: impl CourierPolicy + 'static) -> Self {
        self.courier = Arc::new(courier);
        self
    }

    /// Rebuild the manager around a different clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.manager = Arc::new(ShelfManager::with_clock(self.config.capacities(), clock));
        self
    }

    /// The manager the tasks operate on.
    pub fn manager(&self) -> &Arc<ShelfManager> {
        &self.manager
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn specs(&self) -> &[OrderSpec] {
        &self.specs
    }

    /// Run until the orders drain, the duration cap elapses or `shutdown`
    /// resolves, then return the final statistics.
    pub async fn run<F>(&self, shutdown: F) -> Result<ManagerStats, SimError>
    where
        F: Future<Output = ()>,
    {
        let (stop, mut finished) = watch::channel(false);
        let shared = Arc::new(Shared {
            manager: Arc::clone(&self.manager),
            config: self.config.clone(),
            specs: Arc::clone(&self.specs),
            courier: Arc::clone(&self.courier),
            stop,
        });

        let caps = self.config.capacities();
        info!(
            hot = caps.hot,
            cold = caps.cold,
            frozen = caps.frozen,
            overflow = caps.overflow,
            orders_per_second = self.config.orders_per_second,
            orders = self.specs.len(),
            "starting simulation"
        );

        let mut tasks = JoinSet::new();
        tasks.spawn(produce(Arc::clone(&shared)));
        tasks.spawn(deliver(Arc::clone(&shared)));
        tasks.spawn(sweep(Arc::clone(&shared)));
        tasks.spawn(report_progress(Arc::clone(&shared)));

        let limit = self.config.max_duration();
        let deadline = async move {
            match limit {
                Some(limit) => time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = deadline => info!("maximum simulation time reached"),
            _ = shutdown => info!("shutdown requested"),
            _ = stopped(&mut finished) => info!("all orders have been processed"),
        }
        shared.stop.send_replace(true);

        while let Some(joined) = tasks.join_next().await {
            joined.map_err(|e| SimError::Task(e.to_string()))?;
        }

        let stats = self.manager.get_stats();
        info!(
            received = stats.totals.received,
            delivered = stats.totals.delivered,
            wasted = stats.totals.wasted,
            expired = stats.totals.expired,
            "simulation completed"
        );
        Ok(stats)
    }
}

/// Resolves once stop has been signalled (or every sender is gone).
async fn stopped(rx: &mut watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

async fn produce(shared: Arc<Shared>) {
    let mut stop = shared.stop.subscribe();
    let period = shared.config.order_interval();
    let mut ticker = time::interval_at(Instant::now() + period, period);

    for spec in shared.specs.iter() {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = stopped(&mut stop) => return,
        }

        let order = spec.to_order(shared.config.decay_modifier);
        let label = order.to_string();
        match shared.manager.place_order(order) {
            Placement::Shelved(shelf) => info!(
                order = %label,
                %shelf,
                shelf_life = spec.shelf_life,
                decay_rate = spec.decay_rate * shared.config.decay_modifier,
                "order placed"
            ),
            Placement::Wasted(_) => debug!(order = %label, "order rejected"),
        }
    }

    info!(
        grace_secs = shared.config.drain_grace_secs,
        "last order placed, draining"
    );
    tokio::select! {
        _ = time::sleep(shared.config.drain_grace()) => {}
        _ = stopped(&mut stop) => return,
    }
    shared.stop.send_replace(true);
}

async fn deliver(shared: Arc<Shared>) {
    let mut stop = shared.stop.subscribe();
    let mut ticker = time::interval(shared.config.delivery_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = stopped(&mut stop) => return,
        }

        for order in shared.manager.get_all_orders() {
            let delay = shared.courier.delay();
            tokio::select! {
                _ = time::sleep(delay) => {}
                _ = stopped(&mut stop) => return,
            }

            // Already expired or delivered by an earlier pass.
            let Some(delivered) = shared.manager.deliver_order(order.id().as_str()) else {
                continue;
            };
            let value = delivered
                .delivered_at()
                .map_or(0.0, |at| delivered.calculate_value(at));
            info!(order = %delivered, value, "order picked up by courier");
        }
    }
}

async fn sweep(shared: Arc<Shared>) {
    let mut stop = shared.stop.subscribe();
    let mut ticker = time::interval(shared.config.cleanup_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = stopped(&mut stop) => return,
        }
        let expired = shared.manager.remove_expired_orders();
        if expired > 0 {
            debug!(expired, "sweep pass");
        }
    }
}

async fn report_progress(shared: Arc<Shared>) {
    let mut stop = shared.stop.subscribe();
    let period = shared.config.stats_interval();
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = stopped(&mut stop) => return,
        }
        info!("{}", report::current(&shared.manager.get_stats()));
    }
}
