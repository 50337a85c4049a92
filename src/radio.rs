//! trouble-host advertiser behind the [`Radio`] trait

use trouble_host::advertise::{AdStructure, Advertisement, AdvertisementParameters};
use trouble_host::prelude::*;

use crate::error::RadioError;
use crate::model::{AdvertisementKind, AdvertisementSession, LEGACY_ADV_DATA_MAX};
use crate::traits::Radio;

/// Legacy advertising on a trouble-host peripheral.
///
/// Dropping the [`Advertiser`] handle is how trouble-host ends an
/// advertisement, so `stop` cannot fail here.
pub struct BleRadio<'d, C: Controller, P: PacketPool> {
    peripheral: Peripheral<'d, C, P>,
    params: AdvertisementParameters,
    kind: AdvertisementKind,
    adv_data: [u8; LEGACY_ADV_DATA_MAX],
    adv_len: usize,
    scan_data: [u8; LEGACY_ADV_DATA_MAX],
    scan_len: usize,
    advertiser: Option<Advertiser<'d, C, P>>,
}

impl<'d, C: Controller, P: PacketPool> BleRadio<'d, C, P> {
    pub fn new(peripheral: Peripheral<'d, C, P>) -> Self {
        Self {
            peripheral,
            params: AdvertisementParameters::default(),
            kind: AdvertisementKind::NonconnectableScannable,
            adv_data: [0; LEGACY_ADV_DATA_MAX],
            adv_len: 0,
            scan_data: [0; LEGACY_ADV_DATA_MAX],
            scan_len: 0,
            advertiser: None,
        }
    }
}

impl<C: Controller, P: PacketPool> Radio for BleRadio<'_, C, P> {
    fn configure(&mut self, session: &AdvertisementSession<'_>) -> Result<(), RadioError> {
        let uuid = session.service_uuid.to_le_bytes();
        let name = session.local_name.as_bytes();

        self.adv_len = AdStructure::encode_slice(
            &[
                AdStructure::Flags(LE_GENERAL_DISCOVERABLE | BR_EDR_NOT_SUPPORTED),
                AdStructure::ServiceData16 {
                    uuid,
                    data: session.service_data,
                },
                AdStructure::CompleteLocalName(name),
            ],
            &mut self.adv_data[..],
        )
        .map_err(|_| RadioError::PayloadTooLarge {
            needed: session.adv_data_len(),
            max: LEGACY_ADV_DATA_MAX,
        })?;

        self.scan_len = AdStructure::encode_slice(
            &[AdStructure::CompleteLocalName(name)],
            &mut self.scan_data[..],
        )
        .map_err(|_| RadioError::Configuration)?;

        self.params = AdvertisementParameters {
            interval_min: session.interval,
            interval_max: session.interval,
            ..Default::default()
        };
        self.kind = session.kind;
        Ok(())
    }

    async fn start(&mut self) -> Result<(), RadioError> {
        let advertisement = match self.kind {
            AdvertisementKind::NonconnectableScannable => {
                Advertisement::NonconnectableScannableUndirected {
                    adv_data: &self.adv_data[..self.adv_len],
                    scan_data: &self.scan_data[..self.scan_len],
                }
            }
        };

        let advertiser = self
            .peripheral
            .advertise(&self.params, advertisement)
            .await
            .map_err(|_| RadioError::Start)?;
        self.advertiser = Some(advertiser);
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), RadioError> {
        // Dropping the handle cancels the advertisement
        self.advertiser = None;
        Ok(())
    }
}
