//! Demo data for the offline gateway.

use carwash_core::domain::{
    AssignmentId, CarWashService, Cedula, Client, ParkingTariff, Plate, ServiceAssignment,
    ServiceId, TariffId, Vehicle,
};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use super::Tables;

struct DemoClient {
    cedula: u64,
    name: &'static str,
    phone: &'static str,
    address: &'static str,
}

struct DemoVehicle {
    plate: &'static str,
    make: &'static str,
    model: &'static str,
    color: &'static str,
    owner: u64,
}

const CLIENTS: &[DemoClient] = &[
    DemoClient {
        cedula: 1_010_101,
        name: "Ana Torres",
        phone: "300 555 0101",
        address: "Calle 10 #4-21",
    },
    DemoClient {
        cedula: 2_020_202,
        name: "Luis Gomez",
        phone: "310 555 0202",
        address: "Carrera 7 #45-10",
    },
];

const VEHICLES: &[DemoVehicle] = &[
    DemoVehicle {
        plate: "ABC123",
        make: "Mazda",
        model: "3",
        color: "Rojo",
        owner: 1_010_101,
    },
    DemoVehicle {
        plate: "XYZ987",
        make: "Renault",
        model: "Logan",
        color: "Gris",
        owner: 2_020_202,
    },
    DemoVehicle {
        plate: "MOT45E",
        make: "Yamaha",
        model: "FZ",
        color: "Negro",
        owner: 2_020_202,
    },
];

/// (vehicle type, hourly rate, fraction in hundredths of an hour)
const TARIFFS: &[(&str, i64, i64)] = &[("Carro", 4_000, 25), ("Moto", 2_000, 50)];

/// (name, description, price)
const SERVICES: &[(&str, &str, i64)] = &[
    ("Lavado", "Lavado exterior completo", 25_000),
    ("Encerado", "Cera protectora", 15_000),
    ("Aspirado", "Aspirado interior", 10_000),
];

/// Unbilled work waiting on a vehicle: (plate, index into `SERVICES`)
const PENDING: &[(&str, usize)] = &[("XYZ987", 0), ("XYZ987", 2)];

pub(super) fn load(tables: &mut Tables) {
    for c in CLIENTS {
        let Ok(cedula) = Cedula::new(c.cedula) else {
            continue;
        };
        tables.clients.insert(
            cedula,
            Client {
                cedula,
                name: c.name.into(),
                phone: c.phone.into(),
                address: c.address.into(),
            },
        );
    }

    for v in VEHICLES {
        let (Ok(plate), Ok(owner)) = (Plate::new(v.plate), Cedula::new(v.owner)) else {
            continue;
        };
        tables.vehicles.insert(
            plate.clone(),
            Vehicle {
                plate,
                make: v.make.into(),
                model: v.model.into(),
                color: v.color.into(),
                owner,
            },
        );
    }

    for &(vehicle_type, rate, fraction) in TARIFFS {
        let id = TariffId::new(tables.next_id());
        tables.tariffs.insert(
            id,
            ParkingTariff {
                id,
                vehicle_type: vehicle_type.into(),
                hourly_rate: Decimal::from(rate),
                fraction: Decimal::new(fraction, 2),
            },
        );
    }

    let mut service_ids = Vec::with_capacity(SERVICES.len());
    for &(name, description, price) in SERVICES {
        let id = ServiceId::new(tables.next_id());
        service_ids.push(id);
        tables.services.insert(
            id,
            CarWashService {
                id,
                name: name.into(),
                description: description.into(),
                tariff: Decimal::from(price),
            },
        );
    }

    let performed_at = Utc
        .with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
        .single()
        .unwrap_or_else(Utc::now);
    for &(plate, service) in PENDING {
        let (Ok(plate), Some(&service_id)) = (Plate::new(plate), service_ids.get(service)) else {
            continue;
        };
        let id = AssignmentId::new(tables.next_id());
        tables.assignments.insert(
            id,
            ServiceAssignment {
                id,
                plate,
                service_id,
                performed_at,
                billed: false,
            },
        );
    }
}
