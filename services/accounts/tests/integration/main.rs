mod login_test;
mod password_test;
mod session_test;
