use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 구조화된 로깅을 초기화합니다.
/// JSON 형식의 로그를 출력하며, RUST_LOG 환경 변수로 로그 레벨을 제어합니다.
pub fn init_telemetry() {
    let formatting_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .json();

    tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(formatting_layer)
        .init();
}

/// RUST_LOG가 없거나 잘못된 경우 `default_directive`를 사용합니다.
fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_directive() {
        // 전역 subscriber는 한 번만 설치할 수 있으므로 필터 구성만 확인합니다.
        std::env::remove_var("RUST_LOG");
        assert_eq!(env_filter("warn").to_string(), "warn");
    }
}
