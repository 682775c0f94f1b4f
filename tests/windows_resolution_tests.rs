//! End-to-end resolution scenarios for the Windows search-and-filter path,
//! driven through the public API with a mocked process runner.

use magick_exec::subprocess::{MockProcessRunner, ProcessRunner};
use magick_exec::{ErrorKind, Invoker, Platform, Resolver, SearchSettings};
use std::sync::Arc;

fn windows_invoker(mock: &MockProcessRunner) -> Invoker {
    let runner: Arc<dyn ProcessRunner> = Arc::new(mock.clone());
    let resolver = Resolver::new(
        Platform::Windows,
        SearchSettings::default(),
        Arc::clone(&runner),
    );
    Invoker::new(Arc::new(resolver), runner)
}

#[tokio::test]
async fn test_launcher_fallback_inserts_program_name() {
    let mut mock = MockProcessRunner::new();
    mock.expect_command("where")
        .with_args(|args| args == ["convert"])
        .returns_stdout("C:\\Windows\\System32\\convert.exe\r\n")
        .finish();
    mock.expect_command("where")
        .with_args(|args| args == ["magick"])
        .returns_stdout("C:\\Program Files\\ImageMagick-7.1.1-Q16-HDRI\\magick.exe\r\n")
        .finish();
    mock.expect_command("cmd")
        .with_command_line(
            "cmd /d /s /c \"\"C:\\Program Files\\ImageMagick-7.1.1-Q16-HDRI\\magick.exe\" \
             convert in.png -resize 50% out.jpg\"",
        )
        .returns_success()
        .returns_stdout("done\n")
        .finish();

    let invoker = windows_invoker(&mock);
    let result = invoker
        .execute("convert in.png -resize 50% out.jpg")
        .await
        .unwrap();

    assert_eq!(result.stdout, "done\n");
    assert!(mock.verify_called("where", 2));
    assert!(mock.verify_called("cmd", 1));
}

#[tokio::test]
async fn test_missing_launcher_reports_install_folder() {
    let mut mock = MockProcessRunner::new();
    mock.expect_command("where")
        .with_args(|args| args == ["convert"])
        .returns_stdout("C:\\Windows\\System32\\convert.exe\r\n")
        .finish();
    mock.expect_command("where")
        .with_args(|args| args == ["magick"])
        .returns_stderr("INFO: Could not find files for the given pattern(s).\r\n")
        .returns_exit_code(1)
        .finish();

    let invoker = windows_invoker(&mock);
    let err = invoker.execute("convert in.png out.jpg").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(
        err.to_string(),
        "Could not find magick.exe. Is it installed in the default \"ImageMagick\" folder?"
    );
    assert!(mock.verify_called("cmd", 0));
}

#[tokio::test]
async fn test_repeated_execute_searches_once() {
    let mut mock = MockProcessRunner::new();
    mock.expect_command("where")
        .with_args(|args| args == ["identify"])
        .returns_stdout("C:\\Program Files\\ImageMagick\\identify.exe\r\n")
        .times(1)
        .finish();
    mock.expect_command("cmd")
        .returns_stdout("Version: ImageMagick 6.9.12\r\n")
        .times(2)
        .finish();

    let invoker = windows_invoker(&mock);
    invoker.execute("identify -version").await.unwrap();
    invoker.execute("identify -list format").await.unwrap();

    assert!(mock.verify_called("where", 1));
    assert_eq!(
        invoker.resolver().cached("identify").as_deref(),
        Some("C:\\Program Files\\ImageMagick\\identify.exe")
    );
}

#[tokio::test]
async fn test_concurrent_resolution_converges() {
    let mut mock = MockProcessRunner::new();
    mock.expect_command("where")
        .with_args(|args| args == ["mogrify"])
        .returns_stdout("C:\\System32\\mogrify.exe\r\nC:\\ImageMagick\\mogrify.exe\r\n")
        .finish();

    let runner: Arc<dyn ProcessRunner> = Arc::new(mock.clone());
    let resolver = Arc::new(Resolver::new(
        Platform::Windows,
        SearchSettings::default(),
        runner,
    ));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            tokio::spawn(async move { resolver.resolve("mogrify").await })
        })
        .collect();

    for handle in handles {
        assert_eq!(
            handle.await.unwrap().unwrap(),
            "C:\\ImageMagick\\mogrify.exe"
        );
    }
    assert_eq!(resolver.cache_len(), 1);
}
