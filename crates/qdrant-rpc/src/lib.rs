//! gRPC bindings for the vector-search service.
//!
//! Covers the subset of the service API the client uses:
//! - `Collections`: create, delete, list, existence check
//! - `Points`: upsert, delete, search
//! - `Qdrant`: health check
//! - `Snapshots`: create, list, delete
//!
//! Field numbers match the upstream protobuf definitions, so these messages
//! are wire compatible with a real server.

pub mod pb {
    tonic::include_proto!("qdrant");
}

#[cfg(test)]
mod tests {
    use super::pb;
    use prost::Message;

    #[test]
    fn test_value_kind_wire_tags() {
        let value = pb::Value {
            kind: Some(pb::value::Kind::IntegerValue(7)),
        };
        // field 3, varint
        assert_eq!(value.encode_to_vec(), vec![0x18, 0x07]);
    }

    #[test]
    fn test_point_id_uuid_round_trip() {
        let id = pb::PointId {
            point_id_options: Some(pb::point_id::PointIdOptions::Uuid(
                "11111111-1111-1111-1111-111111111111".to_string(),
            )),
        };
        let bytes = id.encode_to_vec();
        let decoded = pb::PointId::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded, id);
    }

    #[test]
    fn test_distance_enum_values() {
        assert_eq!(pb::Distance::Cosine as i32, 1);
        assert_eq!(pb::Distance::Euclid as i32, 2);
        assert_eq!(pb::Distance::Dot as i32, 3);
    }
}
