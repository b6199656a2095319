//! 外部协作方
//!
//! 支付与证书由其他系统负责，引擎只依赖这里的 trait。

mod certificate;
mod payment;

pub use certificate::{CertificateIssuer, StorageCertificateIssuer};
pub use payment::{PaymentVerifier, StoragePaymentVerifier};
