use super::{Job, JobsConfig};
use crate::error::AppError;
use chrono::Utc;
use cron::Schedule;
use std::{str::FromStr, sync::Arc};
use tokio::{
    sync::{RwLock, broadcast, watch},
    task::JoinHandle,
    time::{Duration, sleep},
};
use tracing::{error, info, warn};

/// Job scheduler that runs registered jobs on their cron schedules
pub struct JobScheduler {
    config: JobsConfig,
    handles: Arc<RwLock<Vec<JoinHandle<()>>>>,
    shutdown_tx: broadcast::Sender<()>,
    shutdown_coordinator: Option<watch::Receiver<bool>>,
}

impl JobScheduler {
    pub fn new(config: JobsConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(16);

        Self {
            config,
            handles: Arc::new(RwLock::new(Vec::new())),
            shutdown_tx,
            shutdown_coordinator: None,
        }
    }

    /// Create JobScheduler with graceful shutdown integration
    pub fn with_shutdown_coordinator(
        config: JobsConfig,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        let mut scheduler = Self::new(config);
        scheduler.shutdown_coordinator = Some(shutdown_rx);
        scheduler
    }

    /// Start the job scheduler with registered jobs
    pub async fn start(&mut self, jobs: Vec<Arc<dyn Job>>) -> Result<(), AppError> {
        if !self.config.enabled {
            info!("Job scheduler disabled in configuration");
            return Ok(());
        }

        info!("Starting job scheduler with {} jobs", jobs.len());

        let mut handles = self.handles.write().await;
        for job in jobs {
            let handle = self.spawn_job_with_schedule(job)?;
            handles.push(handle);
        }

        info!("Job scheduler started successfully");
        Ok(())
    }

    /// Stop the job scheduler and wait for running jobs to finish
    pub async fn stop(&mut self) {
        info!("Stopping job scheduler...");

        if self.shutdown_tx.receiver_count() > 0 {
            if let Err(e) = self.shutdown_tx.send(()) {
                warn!("Failed to send shutdown signal: {}", e);
            }
        }

        let mut handles = self.handles.write().await;
        for handle in handles.drain(..) {
            if let Err(e) = handle.await {
                error!("Job handle failed during shutdown: {}", e);
            }
        }

        info!("Job scheduler stopped");
    }

    /// Spawn a job that sleeps until each upcoming fire time of its schedule
    fn spawn_job_with_schedule(&self, job: Arc<dyn Job>) -> Result<JoinHandle<()>, AppError> {
        let cron = self.get_schedule_for_job(job.name())?;
        let schedule = parse_schedule(&cron)?;

        let job_name = job.name().to_string();
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut coordinator_rx = self.shutdown_coordinator.clone();

        let handle = tokio::spawn(async move {
            info!("Job '{}' scheduled with '{}'", job_name, cron);

            loop {
                let Some(delay) = next_run_delay(&schedule) else {
                    warn!("Job '{}' has no upcoming executions", job_name);
                    break;
                };

                tokio::select! {
                    _ = sleep(delay) => {
                        info!("Executing job '{}'", job_name);

                        match job.execute().await {
                            Ok(result) => {
                                info!("Job '{}' completed: {}", job_name, result.message);
                            }
                            Err(e) => {
                                error!("Job '{}' execution error: {}", job_name, e);
                            }
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        info!("Job '{}' received internal shutdown signal", job_name);
                        break;
                    }
                    _ = async {
                        if let Some(ref mut coord_rx) = coordinator_rx {
                            coord_rx.changed().await.ok();
                            *coord_rx.borrow()
                        } else {
                            false
                        }
                    }, if coordinator_rx.is_some() => {
                        info!("Job '{}' received global shutdown signal", job_name);
                        break;
                    }
                }
            }

            info!("Job '{}' stopped", job_name);
        });

        Ok(handle)
    }

    /// Get the schedule configuration for a specific job
    fn get_schedule_for_job(&self, job_name: &str) -> Result<String, AppError> {
        match job_name {
            "statistics_recompute" => Ok(self.config.statistics_recompute.schedule.clone()),
            _ => Err(AppError::Internal(format!("Unknown job: {job_name}"))),
        }
    }
}

/// Parse a 6-field cron expression (sec min hour day month dow)
fn parse_schedule(cron: &str) -> Result<Schedule, AppError> {
    Schedule::from_str(cron)
        .map_err(|e| AppError::Internal(format!("Invalid cron expression '{cron}': {e}")))
}

/// Time left until the next fire time, `None` once the schedule is exhausted
fn next_run_delay(schedule: &Schedule) -> Option<Duration> {
    let next_execution = schedule.upcoming(Utc).next()?;
    Some((next_execution - Utc::now()).to_std().unwrap_or(Duration::ZERO))
}
