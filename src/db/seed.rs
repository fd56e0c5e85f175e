//! Default rows inserted when a table is first observed empty.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

struct FacultySeed {
    name: &'static str,
    role: Option<&'static str>,
    bio: &'static str,
    sort_order: i64,
}

const DEFAULT_FACULTY: &[FacultySeed] = &[
    FacultySeed {
        name: "Prof. Riccardo Valentini",
        role: Some("Direttore Scientifico"),
        bio: "Università della Tuscia - Premio Nobel per la Pace IPCC, esperto internazionale in climate change e carbon cycle",
        sort_order: 1,
    },
    FacultySeed {
        name: "Virgilio Maretto",
        role: Some("Coordinatore"),
        bio: "Esperto in sostenibilità e gestione ambientale, consulente strategico per progetti di transizione ecologica",
        sort_order: 2,
    },
    FacultySeed {
        name: "Dr.ssa Maria Vincenza Chiriacò",
        role: None,
        bio: "CMCC - Specialista in inventari nazionali delle emissioni e metodologie IPCC per il settore LULUCF",
        sort_order: 3,
    },
    FacultySeed {
        name: "Prof. Emanuele Blasi",
        role: None,
        bio: "Università della Tuscia - Esperto in economia agraria e valutazione economica dei servizi ecosistemici",
        sort_order: 4,
    },
    FacultySeed {
        name: "Prof. Tommaso Chiti",
        role: None,
        bio: "Università della Tuscia - Esperto in biogeochemical cycles, soil carbon dynamics e Life Cycle Assessment",
        sort_order: 5,
    },
    FacultySeed {
        name: "Prof. Dario Papale",
        role: None,
        bio: "Università della Tuscia - Specialista in flussi di CO₂, eddy covariance e monitoraggio ecosistemi forestali",
        sort_order: 6,
    },
    FacultySeed {
        name: "Prof. Raffaele Casa",
        role: None,
        bio: "Università della Tuscia - Esperto in agricoltura di precisione, remote sensing e tecnologie per l'agricoltura sostenibile",
        sort_order: 7,
    },
    FacultySeed {
        name: "Prof. Andrea Vannini",
        role: None,
        bio: "Università della Tuscia - Esperto in patologia vegetale e protezione delle colture in sistemi agricoli sostenibili",
        sort_order: 8,
    },
    FacultySeed {
        name: "Prof.ssa Anna Barbati",
        role: None,
        bio: "Università della Tuscia - Specialista in gestione forestale sostenibile, servizi ecosistemici e biodiversità forestale",
        sort_order: 9,
    },
    FacultySeed {
        name: "Prof. Pier Maria Corona",
        role: None,
        bio: "CREA - Esperto in inventari forestali, dendrometria e gestione sostenibile delle risorse forestali",
        sort_order: 10,
    },
    FacultySeed {
        name: "Francesco Rutelli",
        role: None,
        bio: "Esperto in politiche ambientali e governance della sostenibilità, ex Ministro per i Beni e le Attività Culturali",
        sort_order: 11,
    },
    FacultySeed {
        name: "Luca Buonocore",
        role: None,
        bio: "Consulente strategico in sostenibilità e carbon management, esperto in mercati dei crediti di carbonio",
        sort_order: 12,
    },
];

struct PartnerSeed {
    name: &'static str,
    description: &'static str,
    sort_order: i64,
    is_published: bool,
}

/// All default partners are of the `generale` type.
const DEFAULT_PARTNERS: &[PartnerSeed] = &[
    PartnerSeed {
        name: ORGANIZER_PARTNER,
        description: "Partner accademico principale e sede del Master. Coordinamento scientifico e infrastrutture per le attività didattiche e di ricerca.",
        sort_order: 1,
        // Hidden: the organizer has a dedicated section on the site.
        is_published: false,
    },
    PartnerSeed {
        name: "Collaborazioni in definizione",
        description: "In collaborazione con partner scientifici nazionali e internazionali (in fase di definizione). Attività congiunte su ricerca, formazione e innovazione.",
        sort_order: 2,
        is_published: true,
    },
    PartnerSeed {
        name: "Progetti LIFE e Horizon Europe",
        description: "Accesso a case study e progetti pilota europei. Opportunità di stage presso enti della rete europea per l'ambiente.",
        sort_order: 3,
        is_published: true,
    },
    PartnerSeed {
        name: "Aziende Agricole e Agroforestali",
        description: "Network di aziende agricole, agroalimentari e agroforestali per stage, tirocini e applicazioni pratiche delle competenze acquisite.",
        sort_order: 4,
        is_published: true,
    },
    PartnerSeed {
        name: "Associazioni di Categoria",
        description: "Collaborazioni con associazioni di categoria del settore agricolo e forestale per collegamenti con il mondo professionale e opportunità di networking.",
        sort_order: 5,
        is_published: true,
    },
    PartnerSeed {
        name: "Società di Certificazione del Carbonio",
        description: "Esperienza pratica sulla validazione dei crediti di carbonio attraverso collaborazioni con società specializzate nel monitoraggio e certificazione.",
        sort_order: 6,
        is_published: true,
    },
    PartnerSeed {
        name: "Enti Pubblici e Istituzioni Europee",
        description: "Collaborazione per l'analisi delle politiche e normative di settore. Accesso a dati ufficiali e orientamenti normativi europei.",
        sort_order: 7,
        is_published: true,
    },
];

/// The organizing university stays unpublished even on databases seeded
/// before it got its dedicated section.
const ORGANIZER_PARTNER: &str = "Università della Tuscia";

/// Inserts the default datasets into empty tables.
///
/// Runs on every bootstrap but only writes when a table has zero rows, so
/// repeated invocations never duplicate seeds.
pub async fn seed_defaults(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let faculty_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM faculty")
        .fetch_one(pool)
        .await?;
    if faculty_count == 0 {
        let now = Utc::now();
        for member in DEFAULT_FACULTY {
            sqlx::query(
                r"
                INSERT INTO faculty (id, name, role, bio, photo_url, profile_link, sort_order, is_published, created_at, updated_at)
                VALUES (?, ?, ?, ?, NULL, NULL, ?, 1, ?, ?)
                ",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(member.name)
            .bind(member.role)
            .bind(member.bio)
            .bind(member.sort_order)
            .bind(now)
            .bind(now)
            .execute(pool)
            .await?;
        }
        info!(rows = DEFAULT_FACULTY.len(), "seeded default faculty");
    }

    let partner_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM partners")
        .fetch_one(pool)
        .await?;
    if partner_count == 0 {
        let now = Utc::now();
        for partner in DEFAULT_PARTNERS {
            sqlx::query(
                r"
                INSERT INTO partners (id, name, logo_url, partner_type, description, website_url, sort_order, is_published, created_at, updated_at)
                VALUES (?, ?, NULL, 'generale', ?, NULL, ?, ?, ?, ?)
                ",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(partner.name)
            .bind(partner.description)
            .bind(partner.sort_order)
            .bind(partner.is_published)
            .bind(now)
            .bind(now)
            .execute(pool)
            .await?;
        }
        info!(rows = DEFAULT_PARTNERS.len(), "seeded default partners");
    }

    // Re-applied on every bootstrap, matching rows seeded by older versions.
    sqlx::query("UPDATE partners SET is_published = 0 WHERE name = ?")
        .bind(ORGANIZER_PARTNER)
        .execute(pool)
        .await?;

    Ok(())
}
