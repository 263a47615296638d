use taskflow::error::{exit_codes, Error};

#[test]
fn user_errors_exit_2() {
    let errors = [
        Error::MissingField("title".to_string()),
        Error::InvalidArgument("bad".to_string()),
        Error::InvalidConfig("bad".to_string()),
        Error::NotLoggedIn,
        Error::TaskNotFound("t1".to_string()),
        Error::StageNotFound("s1".to_string()),
    ];
    for err in errors {
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR, "{err}");
    }
}

#[test]
fn server_rejections_exit_3() {
    let err = Error::rejected("move task", Some("stage gone".to_string()));
    assert_eq!(err.exit_code(), exit_codes::SERVER_REJECTED);
}

#[test]
fn operation_failures_exit_4() {
    let err = Error::OperationFailed("boom".to_string());
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);

    let io: Error = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
    assert_eq!(io.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn rejection_carries_details() {
    let err = Error::rejected("reorder stages", None);
    let details = err.details().expect("details");
    assert_eq!(details["operation"], "reorder stages");
    assert_eq!(details["message"], "no message");

    assert!(Error::NotLoggedIn.details().is_none());
}

#[test]
fn rejection_message_is_readable() {
    let err = Error::rejected("move task", Some("stage not accepted".to_string()));
    assert_eq!(
        err.to_string(),
        "Server rejected move task: stage not accepted"
    );
}
