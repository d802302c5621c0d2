use dotenv::dotenv;
use fang::Queue;
use fang::Queueable;
use fang::RetentionMode;
use fang::WorkerPool;
use hnotify::bot::respond_job;
use hnotify::bot::RespondJob;
use hnotify::cleaner;
use hnotify::cleaner::CleanContentJob;
use hnotify::config::Config;
use hnotify::db;
use hnotify::deliver;
use hnotify::deliver::SendAlertsJob;

fn main() {
    dotenv().ok();
    env_logger::init();

    let queue = Queue::builder().connection_pool(db::pool().clone()).build();

    queue
        .schedule_task(&SendAlertsJob::new())
        .expect("Failed to schedule the alerts job");
    queue
        .schedule_task(&RespondJob::new())
        .expect("Failed to schedule the respond job");
    queue
        .schedule_task(&CleanContentJob::new())
        .expect("Failed to schedule the clean job");

    start_workers(&queue, deliver::JOB_TYPE, Config::deliver_workers_number());
    start_workers(&queue, respond_job::JOB_TYPE, Config::respond_workers_number());
    start_workers(&queue, cleaner::JOB_TYPE, Config::clean_workers_number());

    log::info!("Started the hnotify bot");

    std::thread::park();
}

fn start_workers(queue: &Queue, task_type: &str, workers_number: u32) {
    let mut worker_pool = WorkerPool::<Queue>::builder()
        .queue(queue.clone())
        .retention_mode(RetentionMode::RemoveAll)
        .number_of_workers(workers_number)
        .task_type(task_type.to_string())
        .build();

    worker_pool
        .start()
        .expect("Failed to start a worker pool");
}
