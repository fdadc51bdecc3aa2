use std::fs;
use std::sync::{Arc, Mutex};

use restore_engine::{
    EngineSettings, JobError, JobRequest, JobRunner, ProcessJobRunner, ProgressEvent,
    ProgressSink, FINAL_OUTPUT_DIR,
};
use tempfile::TempDir;

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl TestSink {
    fn take(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Project root with a shell script standing in for `run.py`, plus one input image.
fn project(script: &str) -> (TempDir, String) {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("run.py"), script).unwrap();
    let image = root.path().join("photo.jpg");
    fs::write(&image, b"jpeg").unwrap();
    let image = image.to_string_lossy().into_owned();
    (root, image)
}

fn request(run_id: &str, input: &str) -> JobRequest {
    JobRequest {
        python_executable: "sh".to_string(),
        with_scratch: true,
        ..JobRequest::new(run_id, input)
    }
}

#[cfg(unix)]
#[tokio::test]
async fn successful_run_streams_stages_and_returns_latest_output() {
    // $2 is --input_folder's value, $4 is --output_folder's.
    let (root, image) = project(
        "echo 'Loading model'\n\
         echo 'Running Stage 1: Overall restoration'\n\
         echo 'low memory' 1>&2\n\
         echo 'Running Stage 3: Face Enhancement'\n\
         cp \"$2\"/photo.jpg \"$4\"/final_output/photo_mod.jpg\n",
    );
    let runner = ProcessJobRunner::new(EngineSettings::with_root(root.path()));
    let sink = TestSink::default();

    let output = runner.run(request("run-1", &image), &sink).await.unwrap();

    let expected = root
        .path()
        .join("output_gui")
        .join(FINAL_OUTPUT_DIR)
        .join("photo_mod.jpg");
    assert_eq!(output.output_path, expected);
    assert_eq!(fs::read(&expected).unwrap(), b"jpeg");

    let events = sink.take();
    assert!(events.iter().all(|e| e.run_id == "run-1"));
    let first = events.first().unwrap();
    assert_eq!((first.stage, first.message.as_str()), (Some(0), "Starting..."));
    let last = events.last().unwrap();
    assert_eq!((last.stage, last.message.as_str()), (Some(4), "Done"));

    let stdout: Vec<(Option<u8>, &str)> = events
        .iter()
        .filter(|e| !e.is_error)
        .map(|e| (e.stage, e.message.as_str()))
        .collect();
    assert_eq!(
        stdout,
        vec![
            (Some(0), "Starting..."),
            (Some(0), "Loading model"),
            (Some(1), "Running Stage 1: Overall restoration"),
            (Some(3), "Running Stage 3: Face Enhancement"),
            (Some(4), "Done"),
        ]
    );
    assert!(events.iter().any(|e| e.is_error && e.message == "low memory"));
}

#[cfg(unix)]
#[tokio::test]
async fn non_zero_exit_fails_and_emits_error_event() {
    let (root, image) = project("echo 'Running Stage 2: Detect Face'\nexit 3\n");
    let runner = ProcessJobRunner::new(EngineSettings::with_root(root.path()));
    let sink = TestSink::default();

    let err = runner.run(request("run-2", &image), &sink).await.unwrap_err();

    assert!(matches!(err, JobError::ExitStatus(_)));
    let last = sink.take().pop().unwrap();
    assert!(last.is_error);
    assert_eq!(last.stage, Some(2));
    assert!(last.message.starts_with("Python exited with status:"));
}

#[cfg(unix)]
#[tokio::test]
async fn run_without_output_image_fails() {
    let (root, image) = project("echo 'Running Stage 4: Blending'\n");
    let runner = ProcessJobRunner::new(EngineSettings::with_root(root.path()));
    let sink = TestSink::default();

    let err = runner.run(request("run-3", &image), &sink).await.unwrap_err();

    assert!(matches!(err, JobError::NoOutput(_)));
    assert!(err.to_string().starts_with("No output image found under"));
}

#[tokio::test]
async fn missing_input_is_reported_before_spawning() {
    let (root, _image) = project("exit 0\n");
    let runner = ProcessJobRunner::new(EngineSettings::with_root(root.path()));
    let sink = TestSink::default();
    let missing = root.path().join("absent.jpg");

    let err = runner
        .run(request("run-4", &missing.to_string_lossy()), &sink)
        .await
        .unwrap_err();

    assert!(matches!(err, JobError::InputNotFound(ref p) if p == &missing));
    assert_eq!(sink.take().len(), 1);
}

#[tokio::test]
async fn missing_script_is_reported() {
    let root = TempDir::new().unwrap();
    let image = root.path().join("photo.jpg");
    fs::write(&image, b"jpeg").unwrap();
    let runner = ProcessJobRunner::new(EngineSettings::with_root(root.path()));
    let sink = TestSink::default();

    let err = runner
        .run(request("run-5", &image.to_string_lossy()), &sink)
        .await
        .unwrap_err();

    assert!(matches!(err, JobError::ScriptNotFound(ref p) if p == &root.path().join("run.py")));
    // Staging already happened by then.
    assert!(root.path().join("output_gui/_gui_input/photo.jpg").is_file());
}
