pub mod detect_session_use_case;
