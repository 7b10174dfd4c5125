//! Control thread: the single authority over the roast session.
//!
//! One dedicated thread owns the [`RoastService`], its ports and the
//! profile store.  It runs an `edge-executor` with two cooperative tasks:
//!
//! 1. **Tick**: samples, controls and logs every `tick_interval_ms` via
//!    an `async-io-mini` reactor timer.  Runs in every state, so idle
//!    periods still publish telemetry.
//! 2. **Command**: wakes on the bounded `embassy-sync` request channel,
//!    applies the command and signals the reply back to the caller.
//!
//! Because both tasks share one thread, a command never interleaves with
//! a tick: state mutation is serialised without locks.
//!
//! ```text
//!  ┌────────────┐ Request  ┌─────────────────────────────────────┐
//!  │ Controller │────────▶│ roast-control thread                 │
//!  │  ::send()  │◀────────│  LocalExecutor                       │
//!  └────────────┘  reply   │   ┌──────────┐   ┌────────────────┐ │
//!                          │   │ Tick ⏱   │   │ Command (wake) │ │
//!  ┌────────────┐  events  │   └────┬─────┘   └───────┬────────┘ │
//!  │ Subscriber │◀─────────│        └── RoastService ─┘          │
//!  └────────────┘          └─────────────────────────────────────┘
//! ```

use core::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use log::{error, info, warn};

use crate::adapters::log_sink::LogEventSink;
use crate::app::commands::{CommandReply, RoastCommand};
use crate::app::events::RoastEvent;
use crate::app::ports::{EventSink, HeaterPort, ProfilePort, SensorPort, TimePort};
use crate::app::service::RoastService;
use crate::config::RoasterConfig;
use crate::error::{Result, RoastError};
use crate::events::{EventBus, Subscription};

/// Pending command requests before callers are turned away.
pub const COMMAND_DEPTH: usize = 8;

/// How often a waiting caller checks that the control thread is alive.
const LIVENESS_POLL: Duration = Duration::from_millis(100);

type ReplySignal = Signal<CriticalSectionRawMutex, Result<CommandReply>>;
type RequestChannel = Channel<CriticalSectionRawMutex, Request, COMMAND_DEPTH>;
type ShutdownSignal = Signal<CriticalSectionRawMutex, ()>;

struct Request {
    command: RoastCommand,
    reply: Arc<ReplySignal>,
}

// ── Event fan-out ────────────────────────────────────────────

/// Every event goes to the log and to the subscriber bus.
struct RuntimeSink {
    log: LogEventSink,
    bus: Arc<EventBus>,
}

impl EventSink for RuntimeSink {
    fn emit(&mut self, event: &RoastEvent) {
        self.log.emit(event);
        self.bus.publish(event);
    }
}

// ── Thread-local core ────────────────────────────────────────

struct Core<S, H, P, T> {
    service: RoastService<S, H>,
    store: P,
    clock: T,
    sink: RuntimeSink,
}

impl<S: SensorPort, H: HeaterPort, P: ProfilePort, T: TimePort> Core<S, H, P, T> {
    fn tick(&mut self) {
        let now = self.clock.uptime();
        self.service.tick(now, &mut self.sink);
    }

    fn handle(&mut self, command: RoastCommand) -> Result<CommandReply> {
        let now = self.clock.uptime();
        let reply = self
            .service
            .handle_command(command, now, &self.store, &mut self.sink);
        if let Err(e) = &reply {
            warn!("Command rejected: {e}");
        }
        reply
    }
}

type SharedCore<S, H, P, T> = Rc<RefCell<Core<S, H, P, T>>>;

async fn tick_loop<S, H, P, T>(core: SharedCore<S, H, P, T>, period: Duration)
where
    S: SensorPort,
    H: HeaterPort,
    P: ProfilePort,
    T: TimePort,
{
    loop {
        core.borrow_mut().tick();
        async_io_mini::Timer::after(period).await;
    }
}

async fn command_loop<S, H, P, T>(core: SharedCore<S, H, P, T>, requests: Arc<RequestChannel>)
where
    S: SensorPort,
    H: HeaterPort,
    P: ProfilePort,
    T: TimePort,
{
    loop {
        let request = requests.receive().await;
        let reply = core.borrow_mut().handle(request.command);
        request.reply.signal(reply);
    }
}

fn run_control_loop<S, H, P, T>(
    core: Core<S, H, P, T>,
    period: Duration,
    requests: Arc<RequestChannel>,
    shutdown: Arc<ShutdownSignal>,
) where
    S: SensorPort,
    H: HeaterPort,
    P: ProfilePort,
    T: TimePort,
{
    let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();
    let core: SharedCore<S, H, P, T> = Rc::new(RefCell::new(core));

    executor.spawn(tick_loop(core.clone(), period)).detach();
    executor
        .spawn(command_loop(core.clone(), requests.clone()))
        .detach();

    info!("Control loop started (tick {} ms)", period.as_millis());

    futures_lite::future::block_on(executor.run(shutdown.wait()));
    drop(executor);

    // Answer anyone still queued, then leave the heater off.
    while let Ok(request) = requests.try_receive() {
        request.reply.signal(Err(RoastError::Unavailable));
    }
    let mut guard = core.borrow_mut();
    let Core { service, sink, .. } = &mut *guard;
    service.stop(sink);
    info!(
        "Control loop stopped after {} ticks, heater {}",
        service.tick_count(),
        if service.heater_on() { "ON" } else { "off" }
    );
}

// ── Controller handle ────────────────────────────────────────

/// Owning handle to the control thread.
///
/// Dropping it (or calling [`Controller::shutdown`]) stops any session,
/// leaves the heater off and joins the thread.
pub struct Controller {
    requests: Arc<RequestChannel>,
    shutdown: Arc<ShutdownSignal>,
    bus: Arc<EventBus>,
    thread: Option<JoinHandle<()>>,
}

impl Controller {
    /// Move the ports onto a new `roast-control` thread and start ticking.
    pub fn spawn<S, H, P, T>(
        config: &RoasterConfig,
        sensor: S,
        heater: H,
        store: P,
        clock: T,
    ) -> std::io::Result<Self>
    where
        S: SensorPort + Send + 'static,
        H: HeaterPort + Send + 'static,
        P: ProfilePort + Send + 'static,
        T: TimePort + Send + 'static,
    {
        let requests = Arc::new(RequestChannel::new());
        let shutdown = Arc::new(ShutdownSignal::new());
        let bus = Arc::new(EventBus::new());

        let core = Core {
            service: RoastService::new(config, sensor, heater),
            store,
            clock,
            sink: RuntimeSink {
                log: LogEventSink::new(),
                bus: bus.clone(),
            },
        };
        let period = config.tick_period();

        let thread = {
            let requests = requests.clone();
            let shutdown = shutdown.clone();
            std::thread::Builder::new()
                .name("roast-control".into())
                .spawn(move || run_control_loop(core, period, requests, shutdown))?
        };

        Ok(Self {
            requests,
            shutdown,
            bus,
            thread: Some(thread),
        })
    }

    /// Submit a command and wait for its acknowledgment.
    ///
    /// Fails with [`RoastError::Unavailable`] when the request queue is
    /// full or the control thread is gone.
    pub fn send(&self, command: RoastCommand) -> Result<CommandReply> {
        if !self.is_running() {
            return Err(RoastError::Unavailable);
        }

        let reply = Arc::new(ReplySignal::new());
        let request = Request {
            command,
            reply: reply.clone(),
        };
        if self.requests.try_send(request).is_err() {
            warn!("Command queue full ({} pending)", COMMAND_DEPTH);
            return Err(RoastError::Unavailable);
        }

        futures_lite::future::block_on(futures_lite::future::or(reply.wait(), async {
            loop {
                async_io_mini::Timer::after(LIVENESS_POLL).await;
                if !self.is_running() {
                    return reply.try_take().unwrap_or(Err(RoastError::Unavailable));
                }
            }
        }))
    }

    /// Register an event subscriber.  `None` when all slots are taken.
    pub fn subscribe(&self) -> Option<Subscription> {
        self.bus.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the session, turn the heater off and join the thread.
    pub fn shutdown(mut self) {
        self.stop_thread();
    }

    fn stop_thread(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        self.shutdown.signal(());
        if thread.join().is_err() {
            error!("Control thread panicked");
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop_thread();
    }
}
