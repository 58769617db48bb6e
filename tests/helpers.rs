// Shared test helpers for building database fixtures.
//
// Integration tests cannot reach the crate's #[cfg(test)] items, so the small
// ipdb writer lives here as well.

use std::net::Ipv4Addr;
use std::path::Path;

use ip_location::DatabasePaths;

/// Fields carried by every fixture record.
pub const FIELDS: [&str; 6] = [
    "country_name",
    "region_name",
    "city_name",
    "latitude",
    "longitude",
    "timezone",
];

#[derive(Clone, Copy)]
enum Child {
    Empty,
    Node(usize),
    Leaf(usize),
}

/// IPv4-only ipdb writer with a single "CN" language block.
pub struct IpdbBuilder {
    fields: Vec<String>,
    nodes: Vec<[Child; 2]>,
    records: Vec<String>,
    min_len: usize,
}

impl IpdbBuilder {
    pub fn new(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            nodes: vec![[Child::Empty, Child::Empty]],
            records: Vec::new(),
            min_len: 0,
        }
    }

    /// Maps `addr/prefix_len` to one record. Prefixes must not nest.
    pub fn insert_v4(mut self, addr: &str, prefix_len: usize, values: &[&str]) -> Self {
        assert_eq!(values.len(), self.fields.len(), "one value per field");
        let octets = addr.parse::<Ipv4Addr>().expect("fixture address").octets();

        let mut bits = vec![0u8; 80];
        bits.extend(std::iter::repeat(1u8).take(16));
        for i in 0..prefix_len {
            bits.push((octets[i >> 3] >> (7 - (i % 8))) & 1);
        }

        self.records.push(values.join("\t"));
        let record = self.records.len() - 1;

        let mut node = 0;
        for (depth, bit) in bits.iter().enumerate() {
            let bit = *bit as usize;
            if depth == bits.len() - 1 {
                self.nodes[node][bit] = Child::Leaf(record);
                break;
            }
            node = match self.nodes[node][bit] {
                Child::Node(next) => next,
                Child::Empty => {
                    self.nodes.push([Child::Empty, Child::Empty]);
                    let next = self.nodes.len() - 1;
                    self.nodes[node][bit] = Child::Node(next);
                    next
                }
                Child::Leaf(_) => panic!("nested fixture prefixes are not supported"),
            };
        }
        self
    }

    /// Pads the data section to at least `len` bytes.
    #[allow(dead_code)] // Used by provisioning tests
    pub fn min_len(mut self, len: usize) -> Self {
        self.min_len = len;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let node_count = self.nodes.len();

        let mut record_area = vec![0u8];
        let mut offsets = Vec::with_capacity(self.records.len());
        for record in &self.records {
            offsets.push(record_area.len());
            record_area.extend_from_slice(&(record.len() as u16).to_be_bytes());
            record_area.extend_from_slice(record.as_bytes());
        }

        let mut data = Vec::with_capacity(node_count * 8 + record_area.len());
        for node in &self.nodes {
            for child in node {
                let value = match *child {
                    Child::Empty => node_count,
                    Child::Node(index) => index,
                    Child::Leaf(record) => node_count + offsets[record],
                };
                data.extend_from_slice(&(value as u32).to_be_bytes());
            }
        }
        data.extend_from_slice(&record_area);
        if data.len() < self.min_len {
            data.resize(self.min_len, 0);
        }

        let metadata = serde_json::json!({
            "build": 1_700_000_000i64,
            "ip_version": 1,
            "languages": { "CN": 0 },
            "node_count": node_count,
            "total_size": data.len(),
            "fields": self.fields,
        });
        let metadata = serde_json::to_vec(&metadata).expect("fixture metadata");

        let mut bytes = (metadata.len() as u32).to_be_bytes().to_vec();
        bytes.extend_from_slice(&metadata);
        bytes.extend_from_slice(&data);
        bytes
    }
}

/// Builder preloaded with a few known networks.
pub fn standard_ipdb() -> IpdbBuilder {
    IpdbBuilder::new(&FIELDS)
        .insert_v4(
            "1.2.3.0",
            24,
            &["中国", "福建", "福州", "26.074508", "119.296494", "Asia/Shanghai"],
        )
        .insert_v4(
            "114.114.114.0",
            24,
            &["中国", "江苏", "南京", "32.060255", "118.796877", "Asia/Shanghai"],
        )
        .insert_v4("10.0.0.0", 8, &["未知", "未知", "", "", "", ""])
}

/// Writes the standard PureIPDB fixture into `data_dir`; GeoLite2 stays absent.
#[allow(dead_code)] // Used by other test files
pub fn install_primary_fixture(data_dir: &Path) -> DatabasePaths {
    let paths = DatabasePaths::from_data_dir(data_dir);
    std::fs::create_dir_all(paths.pureip.parent().expect("fixture parent"))
        .expect("Failed to create fixture directory");
    std::fs::write(&paths.pureip, standard_ipdb().build()).expect("Failed to write fixture");
    paths
}

/// Well-known public resolver and site addresses: ten IPv4, then ten IPv6.
#[allow(dead_code)] // Used by batch tests
pub const EXAMPLE_ADDRESSES: [&str; 20] = [
    "8.8.8.8",
    "8.8.4.4",
    "1.1.1.1",
    "208.67.222.222",
    "91.198.174.192",
    "172.217.21.142",
    "31.13.72.36",
    "104.244.42.193",
    "13.107.42.16",
    "151.101.1.140",
    "2001:4860:4860::8888",
    "2001:4860:4860::8844",
    "2606:4700:4700::1111",
    "2620:0:2d0:200::7",
    "2a03:2880:f131:83:face:b00c:0:25de",
    "2400:cb00:2048:1::c629:d7a2",
    "2a00:1450:4001:814::200e",
    "2606:2800:220:1:248:1893:25c8:1946",
    "2620:1ec:8fc::1",
    "2001:67c:2564:a102::5",
];

/// Writes a sample batch input: header `序号,IP地址`, then numbered addresses.
#[allow(dead_code)] // Used by batch tests
pub fn write_example_workbook(path: &Path) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "序号").expect("header");
    worksheet.write_string(0, 1, "IP地址").expect("header");
    for (index, address) in EXAMPLE_ADDRESSES.iter().enumerate() {
        let row = (index + 1) as u32;
        worksheet
            .write_number(row, 0, (index + 1) as f64)
            .expect("id cell");
        worksheet.write_string(row, 1, *address).expect("address cell");
    }
    workbook.save(path).expect("Failed to write example workbook");
}
