//! Builds small ipdb files for unit tests.

use std::net::Ipv4Addr;

/// Build time stamped into fixture metadata (2023-11-14 22:13:20 UTC).
pub(crate) const FIXTURE_BUILD_TIME: i64 = 1_700_000_000;

#[derive(Clone, Copy)]
enum Child {
    Empty,
    Node(usize),
    Leaf(usize),
}

/// IPv4-only ipdb writer with a single "CN" language block.
pub(crate) struct IpdbBuilder {
    fields: Vec<String>,
    nodes: Vec<[Child; 2]>,
    records: Vec<String>,
}

impl IpdbBuilder {
    pub(crate) fn new(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            nodes: vec![[Child::Empty, Child::Empty]],
            records: Vec::new(),
        }
    }

    /// Maps `addr/prefix_len` to one record. Prefixes must not nest.
    pub(crate) fn insert_v4(mut self, addr: &str, prefix_len: usize, values: &[&str]) -> Self {
        assert_eq!(values.len(), self.fields.len(), "one value per field");
        let octets = addr.parse::<Ipv4Addr>().expect("fixture address").octets();

        // IPv4 lives under ::ffff:0:0/96
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

    pub(crate) fn build(self) -> Vec<u8> {
        let node_count = self.nodes.len();

        // Leading pad keeps every record pointer strictly above node_count.
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

        let metadata = serde_json::json!({
            "build": FIXTURE_BUILD_TIME,
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
