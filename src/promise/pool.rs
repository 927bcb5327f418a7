use std::sync::OnceLock;
use std::thread::{available_parallelism, Builder, JoinHandle};
use anyhow::{anyhow, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, error};
use crate::context;

#[derive(Clone, Debug)]
pub struct Config {
    pub workers: usize,
    pub name:    String,
}

pub struct Pool {
    config: Config,
}

#[derive(Clone)]
pub struct Handle {
    sender: Sender<Command>,
}

pub struct Guard {
    handle:  Handle,
    threads: Vec<JoinHandle<()>>,
}

type Job = Box<dyn FnOnce() + Send>;

struct Worker {
    receiver: Receiver<Command>,
}

enum Command {
    Run(Option<context::Identifier>, Job),
    Stop,
}

impl Pool {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn exec(self) -> Result<(Handle, Guard)> {
        let (sender, receiver) = unbounded();

        let handle  = Handle { sender };
        let workers = self.config.workers.max(1);

        let mut guard = Guard {
            handle:  handle.clone(),
            threads: Vec::with_capacity(workers),
        };

        for index in 0..workers {
            let worker = Worker { receiver: receiver.clone() };
            let name   = format!("{}-{}", self.config.name, index);

            let thread = Builder::new().name(name).spawn(move || {
                match worker.exec() {
                    Ok(()) => debug!("worker finished"),
                    Err(e) => error!("worker failed: {e:?}"),
                }
            })?;

            guard.threads.push(thread);
        }

        debug!(workers, name = %self.config.name, "pool started");

        Ok((handle, guard))
    }
}

impl Handle {
    pub(crate) fn execute<F: FnOnce() + Send + 'static>(&self, job: F) -> Result<()> {
        let id = context::global().current_context_id();
        self.send(Command::Run(id, Box::new(job)))
    }

    fn send(&self, cmd: Command) -> Result<()> {
        match self.sender.send(cmd) {
            Ok(()) => Ok(()),
            Err(_) => Err(anyhow!("pool terminated")),
        }
    }
}

impl Worker {
    fn exec(self) -> Result<()> {
        loop {
            match self.receiver.recv() {
                Ok(Command::Run(id, job))  => context::execute_inside(id, job),
                Ok(Command::Stop) | Err(_) => break,
            }
        }
        Ok(())
    }
}

pub fn default() -> Result<Handle> {
    static DEFAULT: OnceLock<(Handle, Guard)> = OnceLock::new();

    if let Some((handle, _)) = DEFAULT.get() {
        return Ok(handle.clone());
    }

    let (handle, guard) = Pool::new(Config::default()).exec()?;
    match DEFAULT.set((handle, guard)) {
        Ok(()) => (),
        Err(_) => debug!("default pool raced, discarding"),
    }

    match DEFAULT.get() {
        Some((handle, _)) => Ok(handle.clone()),
        None              => Err(anyhow!("default pool unavailable")),
    }
}

impl Default for Config {
    fn default() -> Self {
        let workers = match available_parallelism() {
            Ok(n)  => n.get(),
            Err(_) => 4,
        };

        Self {
            workers: workers,
            name:    "vow-worker".to_owned(),
        }
    }
}

impl Drop for Guard {
    fn drop(&mut self) {
        for _ in &self.threads {
            let _ = self.handle.send(Command::Stop);
        }

        for thread in self.threads.drain(..) {
            match thread.join() {
                Ok(()) => (),
                Err(e) => error!("join error: {e:?}"),
            }
        }
    }
}
