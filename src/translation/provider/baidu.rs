//! 百度通用翻译 API 客户端
//!
//! 请求以表单 POST 发送：`q`、`from`、`to`、`appid`、`salt`、`sign`，
//! 其中 `sign = md5(appid + q + salt + secret)`，`salt` 取纳秒时间戳。

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::Deserialize;

use super::{TranslatedPair, Translator};
use crate::translation::core::fingerprint::md5_hex;
use crate::translation::error::{ProviderError, ProviderResult};

/// 成功时服务商可能显式返回的错误码
const SUCCESS_CODE: &str = "52000";
/// 写进错误里的响应体最大长度
const MAX_BODY_IN_ERROR: usize = 512;

/// 百度翻译配置
#[derive(Clone)]
pub struct BaiduConfig {
    pub api_url: String,
    pub app_id: String,
    pub secret: String,
    pub timeout: Duration,
}

impl fmt::Debug for BaiduConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaiduConfig")
            .field("api_url", &self.api_url)
            .field("app_id", &self.app_id)
            .field("secret", &"[configured]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct BaiduResponse {
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    trans_result: Option<Vec<TranslatedPair>>,
    #[serde(default)]
    error_code: Option<serde_json::Value>,
    #[serde(default)]
    error_msg: Option<String>,
}

/// 百度翻译客户端
#[derive(Clone)]
pub struct BaiduTranslator {
    client: reqwest::Client,
    config: BaiduConfig,
}

impl BaiduTranslator {
    /// 创建客户端，超时作用于整个请求
    pub fn new(config: BaiduConfig) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Transport(format!("无法创建 HTTP 客户端: {}", e)))?;

        Ok(Self { client, config })
    }

    async fn send(&self, form: &[(&'static str, String)]) -> ProviderResult<String> {
        let response = self
            .client
            .post(&self.config.api_url)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl Translator for BaiduTranslator {
    async fn translate(
        &self,
        query: &str,
        from: &str,
        to: &str,
    ) -> ProviderResult<Vec<TranslatedPair>> {
        let salt = generate_salt();
        let form = build_form(&self.config.app_id, &self.config.secret, query, from, to, &salt);

        tracing::debug!(
            "调用百度翻译: {} 行, {} 字符",
            query.lines().count(),
            query.chars().count()
        );

        let body = self.send(&form).await?;
        parse_response(&body)
    }

    fn name(&self) -> &str {
        "baidu"
    }
}

/// 计算请求签名
pub fn sign(app_id: &str, query: &str, salt: &str, secret: &str) -> String {
    md5_hex(format!("{}{}{}{}", app_id, query, salt, secret).as_bytes())
}

/// 生成请求随机数（纳秒时间戳）
pub fn generate_salt() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .to_string()
}

/// 构建表单字段
pub fn build_form(
    app_id: &str,
    secret: &str,
    query: &str,
    from: &str,
    to: &str,
    salt: &str,
) -> Vec<(&'static str, String)> {
    vec![
        ("q", query.to_string()),
        ("from", from.to_string()),
        ("to", to.to_string()),
        ("appid", app_id.to_string()),
        ("salt", salt.to_string()),
        ("sign", sign(app_id, query, salt, secret)),
    ]
}

/// 解析服务商响应体
pub fn parse_response(body: &str) -> ProviderResult<Vec<TranslatedPair>> {
    let response: BaiduResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode {
            message: e.to_string(),
            body: truncate(body),
        })?;

    if let Some(code) = response.error_code.as_ref().map(error_code_string) {
        if code != SUCCESS_CODE {
            return Err(ProviderError::Api {
                code,
                message: response.error_msg.unwrap_or_default(),
            });
        }
    }

    let pairs = response.trans_result.ok_or_else(|| ProviderError::Decode {
        message: "响应缺少 trans_result".to_string(),
        body: truncate(body),
    })?;

    tracing::trace!(
        from = response.from.as_deref().unwrap_or(""),
        to = response.to.as_deref().unwrap_or(""),
        "百度翻译返回 {} 条结果",
        pairs.len()
    );

    Ok(pairs)
}

fn error_code_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_BODY_IN_ERROR).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_matches_documented_example() {
        // 百度开放平台文档中的签名示例
        let sign = sign("2015063000000001", "apple", "1435660288", "12345678");
        assert_eq!(sign, "f89f9594663708c1605f3d736d01d2d4");
    }

    #[test]
    fn test_build_form_fields() {
        let form = build_form("id", "secret", "猫\n犬", "jp", "zh", "42");
        let fields: Vec<&str> = form.iter().map(|(k, _)| *k).collect();
        assert_eq!(fields, vec!["q", "from", "to", "appid", "salt", "sign"]);
        assert_eq!(form[0].1, "猫\n犬");
        assert_eq!(form[5].1, sign("id", "猫\n犬", "42", "secret"));
    }

    #[test]
    fn test_salt_is_numeric() {
        let salt = generate_salt();
        assert!(!salt.is_empty());
        assert!(salt.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_parse_success() {
        let body = r#"{"from":"jp","to":"zh","trans_result":[{"src":"猫","dst":"猫"},{"src":"犬","dst":"狗"}]}"#;
        let pairs = parse_response(body).unwrap();
        assert_eq!(
            pairs,
            vec![TranslatedPair::new("猫", "猫"), TranslatedPair::new("犬", "狗")]
        );
    }

    #[test]
    fn test_parse_api_error() {
        let body = r#"{"error_code":"54001","error_msg":"Invalid Sign"}"#;
        match parse_response(body) {
            Err(ProviderError::Api { code, message }) => {
                assert_eq!(code, "54001");
                assert_eq!(message, "Invalid Sign");
            }
            other => panic!("unexpected: {:?}", other),
        }

        let numeric = r#"{"error_code":52003,"error_msg":"UNAUTHORIZED USER"}"#;
        assert!(matches!(
            parse_response(numeric),
            Err(ProviderError::Api { .. })
        ));
    }

    #[test]
    fn test_parse_explicit_success_code() {
        let body = r#"{"error_code":"52000","from":"jp","to":"zh","trans_result":[]}"#;
        assert!(parse_response(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse_response("<html>bad gateway</html>"),
            Err(ProviderError::Decode { .. })
        ));
        assert!(matches!(
            parse_response(r#"{"from":"jp","to":"zh"}"#),
            Err(ProviderError::Decode { .. })
        ));
    }

    #[test]
    fn test_config_debug_hides_secret() {
        let config = BaiduConfig {
            api_url: "http://localhost".into(),
            app_id: "id".into(),
            secret: "top-secret".into(),
            timeout: Duration::from_secs(1),
        };
        assert!(!format!("{:?}", config).contains("top-secret"));
    }

    /// 在本地端口上启动的假服务商，验证 HTTP 层的错误区分
    #[cfg(feature = "web")]
    mod http {
        use super::*;
        use axum::http::StatusCode;
        use axum::routing::post;
        use axum::Router;

        async fn spawn_provider() -> String {
            let app = Router::new()
                .route("/bad", post(|| async { (StatusCode::BAD_GATEWAY, "oops") }))
                .route(
                    "/slow",
                    post(|| async {
                        tokio::time::sleep(Duration::from_secs(2)).await;
                        r#"{"from":"jp","to":"zh","trans_result":[]}"#
                    }),
                )
                .route(
                    "/ok",
                    post(|| async { r#"{"from":"jp","to":"zh","trans_result":[{"src":"猫","dst":"猫咪"}]}"# }),
                );

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            format!("http://{}", addr)
        }

        fn translator(api_url: String) -> BaiduTranslator {
            BaiduTranslator::new(BaiduConfig {
                api_url,
                app_id: "id".into(),
                secret: "secret".into(),
                timeout: Duration::from_millis(200),
            })
            .unwrap()
        }

        #[tokio::test]
        async fn test_success_response_is_parsed() {
            let base = spawn_provider().await;
            let pairs = translator(format!("{}/ok", base))
                .translate("猫", "jp", "zh")
                .await
                .unwrap();
            assert_eq!(pairs, vec![TranslatedPair::new("猫", "猫咪")]);
        }

        #[tokio::test]
        async fn test_non_success_status() {
            let base = spawn_provider().await;
            match translator(format!("{}/bad", base)).translate("猫", "jp", "zh").await {
                Err(ProviderError::Status { status, body }) => {
                    assert_eq!(status, 502);
                    assert_eq!(body, "oops");
                }
                other => panic!("unexpected: {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_slow_provider_times_out() {
            let base = spawn_provider().await;
            let result = translator(format!("{}/slow", base))
                .translate("猫", "jp", "zh")
                .await;
            assert!(matches!(result, Err(ProviderError::Timeout)), "{:?}", result);
        }

        #[tokio::test]
        async fn test_refused_connection_is_transport_error() {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let port = listener.local_addr().unwrap().port();
            drop(listener);

            let result = translator(format!("http://127.0.0.1:{}/", port))
                .translate("猫", "jp", "zh")
                .await;
            assert!(matches!(result, Err(ProviderError::Transport(_))), "{:?}", result);
        }
    }
}
