//! S3 static website endpoints per region.
//!
//! Route 53 alias records pointing at a website bucket need both the
//! endpoint host and the endpoint's own hosted zone id.

use webotron_core::BucketName;

/// The website endpoint of one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebsiteEndpoint {
    pub region: &'static str,
    pub host: &'static str,
    pub zone_id: &'static str,
}

impl WebsiteEndpoint {
    /// `http://<bucket>.<host>`
    pub fn bucket_url(&self, bucket: &BucketName) -> String {
        format!("http://{bucket}.{}", self.host)
    }
}

const ENDPOINTS: &[WebsiteEndpoint] = &[
    WebsiteEndpoint { region: "us-east-1", host: "s3-website-us-east-1.amazonaws.com", zone_id: "Z3AQBSTGFYJSTF" },
    WebsiteEndpoint { region: "us-east-2", host: "s3-website.us-east-2.amazonaws.com", zone_id: "Z2O1EMRO9K5GLX" },
    WebsiteEndpoint { region: "us-west-1", host: "s3-website-us-west-1.amazonaws.com", zone_id: "Z2F56UZL2M1ACD" },
    WebsiteEndpoint { region: "us-west-2", host: "s3-website-us-west-2.amazonaws.com", zone_id: "Z3BJ6K6RIION7M" },
    WebsiteEndpoint { region: "ca-central-1", host: "s3-website.ca-central-1.amazonaws.com", zone_id: "Z1QDHH18159H29" },
    WebsiteEndpoint { region: "ap-east-1", host: "s3-website.ap-east-1.amazonaws.com", zone_id: "ZNB98KWMFR0R6" },
    WebsiteEndpoint { region: "ap-south-1", host: "s3-website.ap-south-1.amazonaws.com", zone_id: "Z11RGJOFQNVJUP" },
    WebsiteEndpoint { region: "ap-northeast-1", host: "s3-website-ap-northeast-1.amazonaws.com", zone_id: "Z2M4EHUR26P7ZW" },
    WebsiteEndpoint { region: "ap-northeast-2", host: "s3-website.ap-northeast-2.amazonaws.com", zone_id: "Z3W03O7B5YMIYP" },
    WebsiteEndpoint { region: "ap-northeast-3", host: "s3-website.ap-northeast-3.amazonaws.com", zone_id: "Z2YQB5RD63NC85" },
    WebsiteEndpoint { region: "ap-southeast-1", host: "s3-website-ap-southeast-1.amazonaws.com", zone_id: "Z3O0J2DXBE1FTB" },
    WebsiteEndpoint { region: "ap-southeast-2", host: "s3-website-ap-southeast-2.amazonaws.com", zone_id: "Z1WCIGYICN2BYD" },
    WebsiteEndpoint { region: "eu-central-1", host: "s3-website.eu-central-1.amazonaws.com", zone_id: "Z21DNDUVLTQW6Q" },
    WebsiteEndpoint { region: "eu-west-1", host: "s3-website-eu-west-1.amazonaws.com", zone_id: "Z1BKCTXD74EZPE" },
    WebsiteEndpoint { region: "eu-west-2", host: "s3-website.eu-west-2.amazonaws.com", zone_id: "Z3GKZC51ZF0DB4" },
    WebsiteEndpoint { region: "eu-west-3", host: "s3-website.eu-west-3.amazonaws.com", zone_id: "Z3R1K369G5AVDG" },
    WebsiteEndpoint { region: "eu-north-1", host: "s3-website.eu-north-1.amazonaws.com", zone_id: "Z3BAZG2TWCNX0D" },
    WebsiteEndpoint { region: "sa-east-1", host: "s3-website-sa-east-1.amazonaws.com", zone_id: "Z7KQH4QJS55SO" },
];

/// Look up the website endpoint for `region`.
pub fn website_endpoint(region: &str) -> Option<WebsiteEndpoint> {
    ENDPOINTS.iter().copied().find(|e| e.region == region)
}

/// Map a `GetBucketLocation` constraint to a region name.
///
/// Buckets in `us-east-1` report no constraint; very old `eu-west-1`
/// buckets report the legacy `EU`.
pub fn region_from_location(constraint: Option<&str>) -> &str {
    match constraint {
        None | Some("") => "us-east-1",
        Some("EU") => "eu-west-1",
        Some(region) => region,
    }
}
